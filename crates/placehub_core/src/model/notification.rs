//! Notification feed records.
//!
//! Notifications are append-only: once emitted they are never mutated or
//! deleted, and the core never deduplicates them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::now_epoch_ms;
use crate::model::student::StudentId;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// The fixed placement-office feed shown in the admin view.
    PlacementOffice,
    /// One student's personal feed.
    Student(StudentId),
}

/// One immutable feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: Recipient,
    /// The student this notification is about (not necessarily the
    /// recipient; shortlist events notify the placement office about a
    /// student).
    pub student_id: StudentId,
    pub message: String,
    pub created_at_ms: i64,
}

impl Notification {
    /// Creates a notification stamped with the current time.
    pub fn new(recipient: Recipient, student_id: StudentId, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            student_id,
            message: message.into(),
            created_at_ms: now_epoch_ms(),
        }
    }
}
