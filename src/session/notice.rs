//! Transient, auto-dismissed notifications.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// Single-slot notice channel. A new notice replaces the previous one.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: watch::Sender<Option<Notice>>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx, ttl }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.post(message.into(), Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.post(message.into(), Severity::Error);
    }

    fn post(&self, message: String, severity: Severity) {
        tracing::debug!(%message, ?severity, "notice posted");
        self.tx.send_replace(Some(Notice {
            message,
            severity,
            expires_at: Instant::now() + self.ttl,
        }));
    }

    /// The live notice, or `None` once it has expired.
    pub fn current(&self) -> Option<Notice> {
        self.tx
            .borrow()
            .as_ref()
            .filter(|n| n.expires_at > Instant::now())
            .cloned()
    }

    /// Every posted notice, including ones that have since expired.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.tx.subscribe()
    }
}
