use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::IndexStatus;

use super::{AdminClient, AdminError};

pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Anything able to report the indexing status
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<IndexStatus, AdminError>;
}

#[async_trait]
impl StatusSource for AdminClient {
    async fn fetch_status(&self) -> Result<IndexStatus, AdminError> {
        self.status().await
    }
}

/// Background task refreshing the indexing status at a fixed interval.
/// Stops when dropped.
pub struct StatusPoller {
    status: watch::Receiver<IndexStatus>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Poll right away, then every `interval`
    pub fn spawn<S>(source: Arc<S>, interval: Duration) -> Self
    where
        S: StatusSource + ?Sized + 'static,
    {
        let (tx, status) = watch::channel(IndexStatus::default());
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match source.fetch_status().await {
                    Ok(latest) => {
                        debug!(
                            "Index status: {} documents, {} apartments, in progress: {}",
                            latest.documents_count, latest.apartments_count, latest.in_progress
                        );
                        tx.send_replace(latest);
                    }
                    // keep the last known status
                    Err(e) => warn!("Status poll failed: {}", e),
                }
            }
        });

        Self {
            status,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn latest(&self) -> IndexStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexStatus> {
        self.status.clone()
    }

    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Counts polls; every third one fails
    #[derive(Default)]
    struct CountingSource {
        polls: AtomicU64,
    }

    #[async_trait]
    impl StatusSource for CountingSource {
        async fn fetch_status(&self) -> Result<IndexStatus, AdminError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if n % 3 == 0 {
                return Err(AdminError::Validation("indisponible".to_string()));
            }
            Ok(IndexStatus {
                documents_count: n,
                ..Default::default()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_interval() {
        let source = Arc::new(CountingSource::default());
        let poller = StatusPoller::spawn(source.clone(), POLL_INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.polls.load(Ordering::SeqCst), 1);
        assert_eq!(poller.latest().documents_count, 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(source.polls.load(Ordering::SeqCst), 2);
        assert_eq!(poller.latest().documents_count, 2);

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_last_status() {
        let source = Arc::new(CountingSource::default());
        let poller = StatusPoller::spawn(source.clone(), POLL_INTERVAL);

        // polls at 0, 2000 and 4000; the third fails
        tokio::time::sleep(Duration::from_millis(4010)).await;
        assert_eq!(source.polls.load(Ordering::SeqCst), 3);
        assert_eq!(poller.latest().documents_count, 2);

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stops_polling() {
        let source = Arc::new(CountingSource::default());
        let poller = StatusPoller::spawn(source.clone(), POLL_INTERVAL);
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(poller);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.polls.load(Ordering::SeqCst), 1);
    }
}
