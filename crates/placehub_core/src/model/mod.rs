//! Domain model for the placement verification pipeline.
//!
//! # Responsibility
//! - Define the canonical student record and its four-round pipeline.
//! - Define the append-only notification and shortlist records.
//!
//! # Invariants
//! - Every domain object is identified by a stable `Uuid`.
//! - `overall` and `score` are derived state; only the evaluator writes them.
//! - Notifications and shortlist entries are never mutated after creation.

pub mod notification;
pub mod shortlist;
pub mod student;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
///
/// All domain timestamps use this representation; callers that need a
/// deterministic clock pass explicit values to the `with_*` constructors.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
