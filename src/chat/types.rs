use serde::{Deserialize, Serialize};

use crate::models::{Apartment, QuickReply};

/// One prior turn sent as conversational context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Body of `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub summarize: bool,
    pub conversation_history: Vec<HistoryEntry>,
    /// Document type filter, e.g. "appartement"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, conversation_history: Vec<HistoryEntry>) -> Self {
        Self {
            query: query.into(),
            summarize: true,
            conversation_history,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_apartments: Option<bool>,
    #[serde(default)]
    pub apartments: Vec<Apartment>,
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_type_when_unset() {
        let body = serde_json::to_value(SearchRequest::new("T2 à Lille", vec![])).unwrap();
        assert_eq!(
            body,
            json!({"query": "T2 à Lille", "summarize": true, "conversation_history": []})
        );

        let body = serde_json::to_value(
            SearchRequest::new("T2", vec![]).with_kind(Some("appartement".to_string())),
        )
        .unwrap();
        assert_eq!(body["type"], "appartement");
    }

    #[test]
    fn response_tolerates_missing_lists() {
        let resp: SearchResponse =
            serde_json::from_value(json!({"answer": "Bonjour", "residences_available": []}))
                .unwrap();
        assert_eq!(resp.answer, "Bonjour");
        assert!(resp.apartments.is_empty());
        assert!(resp.quick_replies.is_empty());
        assert_eq!(resp.has_apartments, None);
    }
}
