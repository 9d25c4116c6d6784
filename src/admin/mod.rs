pub mod client;
pub mod filter;
pub mod notice;
pub mod status;
pub mod validation;

use std::path::PathBuf;

use thiserror::Error;

pub use client::AdminClient;
pub use filter::{filter_documents, ApartmentFilter};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use status::{StatusPoller, StatusSource};

/// Every way an admin operation can fail. None of them is retried.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Erreur réseau: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("{0}")]
    Validation(String),

    #[error("Impossible de lire {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
