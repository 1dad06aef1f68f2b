//! Company shortlist records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::now_epoch_ms;
use crate::model::student::StudentId;

/// One company's recorded expression of interest in a verified student.
///
/// Append-only and deliberately not exclusive: the same student may be
/// shortlisted any number of times, by the same or different companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    pub id: Uuid,
    pub student_id: StudentId,
    pub company_id: String,
    pub created_at_ms: i64,
}

impl ShortlistEntry {
    /// Creates a shortlist entry stamped with the current time.
    pub fn new(student_id: StudentId, company_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            company_id: company_id.into(),
            created_at_ms: now_epoch_ms(),
        }
    }
}
