pub mod client;
pub mod session;
pub mod types;

pub use client::{HttpSearchClient, SearchBackend, SearchError};
pub use session::{ChatSession, ChatState, SubmitOutcome};
pub use types::{HistoryEntry, SearchRequest, SearchResponse};
