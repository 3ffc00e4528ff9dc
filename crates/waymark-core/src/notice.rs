//! User-facing notices
//!
//! Operational failures surface a generic, retryable notice rather than an
//! error screen. `Notices` replaces the ambient alert singleton of earlier
//! designs: it is constructed once per process and passed by reference to
//! every component that raises notices.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::broadcast;

const DEFAULT_TITLE: &str = "Unable to fulfill your request";
const DEFAULT_MESSAGE: &str = "Please try again in a few moments";

/// Maximum number of notices retained for late observers.
const MAX_RECENT: usize = 32;

/// A user-visible notice with a title and a short message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short title shown to the user.
    pub title: String,
    /// One-line explanation, always phrased as retryable.
    pub message: String,
}

impl Notice {
    /// Create a notice with an explicit title and message
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create a notice with an explicit title and the default message
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, DEFAULT_MESSAGE)
    }

    /// The generic fallback notice
    pub fn generic() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_MESSAGE)
    }
}

/// Broadcaster for user-facing notices
///
/// Components publish; the (out-of-scope) presentation layer subscribes.
/// Recent notices are retained so a subscriber attached after a failure can
/// still drain it.
pub struct Notices {
    sender: broadcast::Sender<Notice>,
    recent: Mutex<VecDeque<Notice>>,
}

impl Notices {
    /// Create a new notice broadcaster
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            sender,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Publish a notice to all subscribers
    ///
    /// Every published notice is also logged; a notice is always the
    /// user-visible end of an operational failure.
    pub fn publish(&self, notice: Notice) {
        tracing::warn!(title = %notice.title, message = %notice.message, "notice");
        {
            let mut recent = self.recent.lock();
            recent.push_back(notice.clone());
            while recent.len() > MAX_RECENT {
                recent.pop_front();
            }
        }
        // No subscribers is fine; the notice stays in `recent`.
        let _ = self.sender.send(notice);
    }

    /// Subscribe to future notices
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Snapshot of recently published notices, oldest first
    pub fn recent(&self) -> Vec<Notice> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Remove and return the oldest retained notice
    pub fn pop(&self) -> Option<Notice> {
        self.recent.lock().pop_front()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_retains_recent() {
        let notices = Notices::new();
        notices.publish(Notice::titled("Unable to load network"));
        notices.publish(Notice::generic());

        let recent = notices.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Unable to load network");
        assert_eq!(recent[1], Notice::generic());
    }

    #[test]
    fn test_recent_is_bounded() {
        let notices = Notices::new();
        for i in 0..100 {
            notices.publish(Notice::titled(format!("n{i}")));
        }
        assert_eq!(notices.recent().len(), MAX_RECENT);
        assert_eq!(notices.pop().unwrap().title, format!("n{}", 100 - MAX_RECENT));
    }

    #[tokio::test]
    async fn test_subscriber_receives_notice() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        notices.publish(Notice::generic());
        assert_eq!(rx.recv().await.unwrap(), Notice::generic());
    }
}
