use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Apartment;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role name expected by the search endpoint's conversation history
    pub fn as_role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// Suggested answer rendered as a button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    /// Opaque token sent as the next query
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Cards attached under an assistant message. A message carries at most one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Apartments(Vec<Apartment>),
    QuickReplies(Vec<QuickReply>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// True while the assistant text is still being revealed
    pub streaming: bool,
    pub attachment: Option<Attachment>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content.into(), false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content.into(), false)
    }

    /// Empty assistant message waiting for revealed content
    pub fn placeholder() -> Self {
        Self::new(Sender::Assistant, String::new(), true)
    }

    fn new(sender: Sender, content: String, streaming: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            content,
            timestamp: Utc::now(),
            streaming,
            attachment: None,
        }
    }

    pub fn apartments(&self) -> &[Apartment] {
        match &self.attachment {
            Some(Attachment::Apartments(apartments)) => apartments,
            _ => &[],
        }
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        match &self.attachment {
            Some(Attachment::QuickReplies(replies)) => replies,
            _ => &[],
        }
    }
}
