//! Transient user-facing notifications.
//!
//! Notifications are fire-and-forget: producers hand them to a
//! [`NotificationSink`] and never hear back. The bundled [`ToastQueue`] keeps
//! only the most recent few, each visible for a fixed display duration.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::info;

/// Styling of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// An action completed.
    Success,
    /// Neutral information.
    Info,
    /// Something did not go as asked, but nothing broke.
    Warning,
    /// An action failed.
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// How the message is styled.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
    /// When the message was raised.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time.
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Create a warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Anything that accepts notifications.
pub trait NotificationSink {
    /// Deliver a notification. Delivery is best-effort.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Bounded queue of the most recent notifications.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    capacity: usize,
    display_duration: TimeDelta,
    entries: VecDeque<Notification>,
}

impl ToastQueue {
    /// Create a queue keeping at most `capacity` entries, each visible for
    /// `display_duration` after it was raised.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize, display_duration: TimeDelta) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            display_duration,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How long each entry stays visible.
    #[must_use]
    pub fn display_duration(&self) -> TimeDelta {
        self.display_duration
    }

    /// Entries that are still visible at `now`, oldest first.
    ///
    /// A display window reaching past the earliest representable time keeps
    /// every entry visible.
    pub fn visible_at(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Notification> {
        let cutoff = now.checked_sub_signed(self.display_duration);
        self.entries
            .iter()
            .filter(move |entry| cutoff.map_or(true, |cutoff| entry.created_at > cutoff))
    }

    /// Entries visible right now, oldest first.
    #[must_use]
    pub fn visible(&self) -> Vec<&Notification> {
        self.visible_at(Utc::now()).collect()
    }

    /// Every retained entry, expired or not, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Take every retained entry out of the queue.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(3, TimeDelta::seconds(5))
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        info!(level = %notification.level, "{}", notification.message);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notification);
    }
}
