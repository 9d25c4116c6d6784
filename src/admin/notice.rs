use std::time::Duration;

use tokio::time::Instant;

use crate::models::AdminAck;

use super::AdminError;

/// How long a banner stays up
pub const NOTICE_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient banner shown after an admin action
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    shown_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    /// Banner for the outcome of an admin call
    pub fn from_result(result: &Result<AdminAck, AdminError>) -> Self {
        match result {
            Ok(ack) => Self::success(ack.message.clone()),
            Err(e) => Self::error(e.to_string()),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.shown_at.elapsed() >= ttl
    }
}

/// Holds at most one banner; a new one replaces the previous immediately
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self {
            current: None,
            ttl: NOTICE_TTL,
        }
    }
}

impl NoticeBoard {
    pub fn show(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    /// Visible banner, if it has not expired yet
    pub fn current(&mut self) -> Option<&Notice> {
        if self.current.as_ref().is_some_and(|n| n.is_expired(self.ttl)) {
            self.current = None;
        }
        self.current.as_ref()
    }
}
