//! Pipeline evaluation state machine.
//!
//! # Responsibility
//! - Roll the four per-round results up into one overall status.
//! - Compute the aggregate score as the rounded mean of attempted rounds.
//! - Report which feed emissions the status transition triggers.
//!
//! # Invariants
//! - `overall` is a pure function of the four slots; the previous status is
//!   consulted only to gate the verified emission.
//! - A pipeline with any unattempted round is `InProgress` even when every
//!   attempted round failed: failure is not final until the pipeline is
//!   exhausted, so a weak round can still be retaken.
//! - The verified emission is edge-triggered; the feedback emission is not
//!   (every evaluation of a completed-but-failed pipeline emits one).

use crate::model::student::{OverallStatus, Pipeline, RoundStatus};

/// Feed emission requested by an evaluation.
///
/// The service layer turns these into concrete [`Notification`]s; the
/// evaluator itself stays free of ids, clocks and message text.
///
/// [`Notification`]: crate::model::notification::Notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Student passed all four rounds; addressed to the placement feed.
    /// Emitted only on the transition into `Passed`.
    Verified,
    /// Completed pipeline with at least one failed round; addressed to the
    /// student. Emitted on every evaluation in that state.
    Feedback,
}

/// Result of evaluating one student's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub overall: OverallStatus,
    pub score: i32,
    pub emissions: Vec<Emission>,
}

/// Rounded mean of attempted round scores; 0 when nothing was attempted.
///
/// Rounding is half away from zero, which matches conventional rounding for
/// the non-negative scores the pipeline carries.
pub fn aggregate_score(pipeline: &Pipeline) -> i32 {
    let mut total: i64 = 0;
    let mut attempted: i64 = 0;
    for (_, result) in pipeline.attempted() {
        total += i64::from(result.score);
        attempted += 1;
    }
    if attempted == 0 {
        return 0;
    }
    (total as f64 / attempted as f64).round() as i32
}

/// Derives the new overall status, aggregate score and feed emissions.
///
/// `prev` is the overall status stored before this evaluation; it gates the
/// edge-triggered verified emission and nothing else.
pub fn evaluate(pipeline: &Pipeline, prev: OverallStatus) -> Evaluation {
    let all_completed = pipeline.is_complete();
    let all_passed = all_completed
        && pipeline
            .attempted()
            .all(|(_, result)| result.status == RoundStatus::Passed);
    let score = aggregate_score(pipeline);

    let mut emissions = Vec::new();
    let overall = if all_completed && all_passed {
        if prev != OverallStatus::Passed {
            emissions.push(Emission::Verified);
        }
        OverallStatus::Passed
    } else if !all_completed {
        OverallStatus::InProgress
    } else {
        // Deliberately not edge-triggered: every evaluation of a failed
        // pipeline appends another feedback entry.
        emissions.push(Emission::Feedback);
        OverallStatus::Failed
    };

    Evaluation {
        overall,
        score,
        emissions,
    }
}
