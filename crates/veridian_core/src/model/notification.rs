//! In-app notification model.
//!
//! # Invariants
//! - The aggregate keeps at most `MAX_NOTIFICATIONS` entries, newest first.
//! - `id`, `date` and `read` are assigned by the store, never by callers.

use super::{new_entity_id, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum notifications retained in the aggregate.
pub const MAX_NOTIFICATIONS: usize = 20;

/// Severity tag of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
    pub read: bool,
}

/// Caller-supplied part of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    /// Stamps the draft with a generated id and creation time, unread.
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: new_entity_id(),
            title: self.title,
            message: self.message,
            kind: self.kind,
            date: created_at,
            read: false,
        }
    }
}
