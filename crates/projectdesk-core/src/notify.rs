//! User-visible notifications.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message, 3000)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message, 2500)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message, 4500)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message, 4000)
    }

    fn new(level: NotificationLevel, message: impl Into<String>, millis: u64) -> Self {
        Self {
            level,
            message: message.into(),
            duration: Duration::from_millis(millis),
        }
    }
}

/// Sink for notifications. The UI decides how and for how long to show them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
