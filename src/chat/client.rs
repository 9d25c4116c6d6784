use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ChatConfig;

use super::types::{SearchRequest, SearchResponse};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Erreur réseau: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Erreur {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Réponse invalide: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Remote assistant answering chat queries.
/// Lets the conversation run against the HTTP endpoint or an in-process fake.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;

    /// Where the queries go, for logs
    fn endpoint(&self) -> String;
}

/// `POST {search_base_url}/search` over HTTP
pub struct HttpSearchClient {
    client: Client,
    base_url: String,
}

impl HttpSearchClient {
    pub fn new(config: &ChatConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rental-assistant/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.search_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/search", self.base_url);
        debug!(
            "POST {} ({} history entries)",
            url,
            request.conversation_history.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(SearchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search endpoint returned status: {}", status);
            return Err(SearchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.json().await.map_err(SearchError::Decode)
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }
}
