//! Verified-report projection.
//!
//! The core exposes the serializable document only; writing it to a file or
//! streaming it over HTTP is a caller concern.

use serde::Serialize;

use crate::model::student::{OverallStatus, Pipeline, Student, StudentId};

/// Identity block of a verified report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStudent {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub institution: String,
    pub program: String,
    pub grad_year: String,
}

/// JSON document handed to companies for a student who passed all rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedReport {
    pub report_generated_at_ms: i64,
    pub student: ReportStudent,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub pipeline: Pipeline,
    pub overall: OverallStatus,
    pub score: i32,
}

impl VerifiedReport {
    /// Projects one student record into the report document.
    ///
    /// Eligibility (overall status `Passed`) is enforced by the service
    /// layer, not here; this stays a pure projection.
    pub fn for_student(student: &Student, generated_at_ms: i64) -> Self {
        Self {
            report_generated_at_ms: generated_at_ms,
            student: ReportStudent {
                id: student.id,
                name: student.name.clone(),
                email: student.email.clone(),
                institution: student.institution.clone(),
                program: student.program.clone(),
                grad_year: student.grad_year.clone(),
            },
            skills: student.skills.clone(),
            certifications: student.certifications.clone(),
            pipeline: student.pipeline,
            overall: student.overall,
            score: student.score,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
