//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record shared by all portal views.
//! - Define the four-round verification pipeline and its value objects.
//!
//! # Invariants
//! - `id` is stable and never reused for another student.
//! - Each round holds at most one result; a retake overwrites the slot, a
//!   recorded result is never cleared back to "not attempted".
//! - `overall` and `score` are written only from evaluation output.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::now_epoch_ms;

/// Stable identifier for a registered student.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type StudentId = Uuid;

/// Upper bound (inclusive) for a per-round score.
pub const MAX_ROUND_SCORE: i32 = 100;

/// One discrete assessment stage in the verification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    /// Coding assessment.
    Coding,
    /// Aptitude test.
    Aptitude,
    /// Soft-skills assessment.
    SoftSkills,
    /// Background check.
    BackgroundCheck,
}

impl RoundKind {
    /// All round kinds in canonical pipeline order.
    pub const ALL: [RoundKind; 4] = [
        RoundKind::Coding,
        RoundKind::Aptitude,
        RoundKind::SoftSkills,
        RoundKind::BackgroundCheck,
    ];
}

/// Outcome of an attempted round.
///
/// "Not attempted" is modeled by the absence of a [`RoundResult`], not by a
/// third variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Passed,
    Failed,
}

/// Recorded outcome for one round. Overwritten wholesale on retake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub status: RoundStatus,
    /// Integer score in `[0, MAX_ROUND_SCORE]`.
    pub score: i32,
}

/// Aggregate verification state derived from the four round slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// Registered, no round attempted yet.
    Pending,
    /// At least one round outstanding; failures so far are not final.
    InProgress,
    /// All four rounds attempted and passed.
    Passed,
    /// All four rounds attempted, at least one failed.
    Failed,
}

/// The four single-slot round results of one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub coding: Option<RoundResult>,
    pub aptitude: Option<RoundResult>,
    pub soft_skills: Option<RoundResult>,
    pub background_check: Option<RoundResult>,
}

impl Pipeline {
    /// Returns the slot for one round kind.
    pub fn slot(&self, kind: RoundKind) -> Option<RoundResult> {
        match kind {
            RoundKind::Coding => self.coding,
            RoundKind::Aptitude => self.aptitude,
            RoundKind::SoftSkills => self.soft_skills,
            RoundKind::BackgroundCheck => self.background_check,
        }
    }

    /// Overwrites the slot for one round kind.
    ///
    /// This is the only mutation the pipeline supports: a slot can be
    /// written and rewritten, never cleared.
    pub fn record(&mut self, kind: RoundKind, result: RoundResult) {
        let slot = match kind {
            RoundKind::Coding => &mut self.coding,
            RoundKind::Aptitude => &mut self.aptitude,
            RoundKind::SoftSkills => &mut self.soft_skills,
            RoundKind::BackgroundCheck => &mut self.background_check,
        };
        *slot = Some(result);
    }

    /// Iterates attempted rounds in canonical order.
    pub fn attempted(&self) -> impl Iterator<Item = (RoundKind, RoundResult)> + '_ {
        RoundKind::ALL
            .iter()
            .filter_map(|kind| self.slot(*kind).map(|result| (*kind, result)))
    }

    /// True when all four rounds have a recorded result.
    pub fn is_complete(&self) -> bool {
        RoundKind::ALL.iter().all(|kind| self.slot(*kind).is_some())
    }
}

/// Validation failure for student state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyName,
    EmptyEmail,
    ScoreOutOfRange { kind: RoundKind, score: i32 },
}

impl std::fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name must not be empty"),
            Self::EmptyEmail => write!(f, "student email must not be empty"),
            Self::ScoreOutOfRange { kind, score } => write!(
                f,
                "round {kind:?} score {score} outside 0..={MAX_ROUND_SCORE}"
            ),
        }
    }
}

impl std::error::Error for StudentValidationError {}

/// Canonical student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Stable global ID used for linking, notifications and auditing.
    pub id: StudentId,
    pub name: String,
    pub email: String,
    /// Phone or other contact handle; free-form, may be empty.
    pub contact: String,
    pub institution: String,
    pub program: String,
    pub grad_year: String,
    /// Ordered, duplicates allowed.
    pub skills: Vec<String>,
    /// Ordered, duplicates allowed.
    pub certifications: Vec<String>,
    pub pipeline: Pipeline,
    /// Derived; see `pipeline::evaluate`.
    pub overall: OverallStatus,
    /// Derived rounded mean of attempted round scores; 0 when none attempted.
    pub score: i32,
    /// Unix epoch milliseconds, immutable after registration.
    pub created_at_ms: i64,
}

impl Student {
    /// Creates a freshly registered student with a generated stable ID.
    ///
    /// All four pipeline slots start empty, `overall` starts `Pending`,
    /// `score` starts 0.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email, now_epoch_ms())
    }

    /// Creates a student with a caller-provided ID and creation time.
    ///
    /// Used by storage load paths and deterministic tests.
    pub fn with_id(
        id: StudentId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at_ms: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            contact: String::new(),
            institution: String::new(),
            program: String::new(),
            grad_year: String::new(),
            skills: Vec::new(),
            certifications: Vec::new(),
            pipeline: Pipeline::default(),
            overall: OverallStatus::Pending,
            score: 0,
            created_at_ms,
        }
    }

    /// Validates invariants that must hold before any persistence write.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptyEmail` when a required profile field is blank.
    /// - `ScoreOutOfRange` when an attempted round carries a score outside
    ///   `[0, MAX_ROUND_SCORE]`.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(StudentValidationError::EmptyEmail);
        }
        for (kind, result) in self.pipeline.attempted() {
            if result.score < 0 || result.score > MAX_ROUND_SCORE {
                return Err(StudentValidationError::ScoreOutOfRange {
                    kind,
                    score: result.score,
                });
            }
        }
        Ok(())
    }
}
