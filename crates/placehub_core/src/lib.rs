//! Core domain logic for the placement portal.
//! This crate is the single source of truth for pipeline evaluation rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod repo;
pub mod report;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::notification::{Notification, Recipient};
pub use model::shortlist::ShortlistEntry;
pub use model::student::{
    OverallStatus, Pipeline, RoundKind, RoundResult, RoundStatus, Student, StudentId,
    StudentValidationError, MAX_ROUND_SCORE,
};
pub use pipeline::evaluator::{aggregate_score, evaluate, Emission, Evaluation};
pub use repo::placement_repo::{
    PlacementRepository, RepoError, RepoResult, SqlitePlacementRepository, StudentListQuery,
};
pub use report::VerifiedReport;
pub use service::placement_service::{
    is_eligible_for_company_view, CoreError, CoreResult, EvaluationOutcome, PlacementService,
    ProfileUpdate, RegisterStudentRequest,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
