//! Placement use-case service.
//!
//! # Responsibility
//! - Provide the caller-facing placement API: registration, round
//!   submission, evaluation, company pool, shortlisting, feeds, reports.
//! - Turn evaluator emissions into concrete notifications and commit them
//!   with the student update in one storage transaction.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - An evaluation either fully commits (overall + score + notifications)
//!   or leaves no trace.
//! - Service layer remains storage-agnostic.

use log::info;

use crate::model::notification::{Notification, Recipient};
use crate::model::now_epoch_ms;
use crate::model::shortlist::ShortlistEntry;
use crate::model::student::{
    OverallStatus, RoundKind, RoundResult, RoundStatus, Student, StudentId, MAX_ROUND_SCORE,
};
use crate::pipeline::evaluator::{evaluate, Emission};
use crate::repo::placement_repo::{PlacementRepository, RepoError, StudentListQuery};
use crate::report::VerifiedReport;

pub type CoreResult<T> = Result<T, CoreError>;

/// Caller-facing error classification.
#[derive(Debug)]
pub enum CoreError {
    /// Operation referenced an unknown student id.
    NotFound(StudentId),
    /// Malformed input: out-of-range score or blank required profile field.
    InvalidArgument(String),
    /// Shortlist or report requested for a student who has not passed.
    NotEligible {
        student_id: StudentId,
        overall: OverallStatus,
    },
    /// The persistence collaborator could not commit. Propagated unchanged;
    /// retry policy belongs to the storage layer, not the core.
    Storage(RepoError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotEligible {
                student_id,
                overall,
            } => write!(
                f,
                "student {student_id} is not eligible (overall is {overall:?}, requires passed)"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Registration input, mirroring the portal's signup form.
#[derive(Debug, Clone, Default)]
pub struct RegisterStudentRequest {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub institution: String,
    pub program: String,
    pub grad_year: String,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
}

/// Partial profile edit; `None` fields are left untouched.
///
/// Pipeline, overall status and score are not editable through this path.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub institution: Option<String>,
    pub program: Option<String>,
    pub grad_year: Option<String>,
    pub skills: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
}

/// What one evaluation committed: the derived state plus the notifications
/// appended alongside it.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub overall: OverallStatus,
    pub score: i32,
    pub notifications: Vec<Notification>,
}

/// Returns whether the company-facing listing may show this student.
///
/// This is the sole visibility gate; per-company filtering (skills, minimum
/// score) is a presentation concern and does not live in the core.
pub fn is_eligible_for_company_view(student: &Student) -> bool {
    student.overall == OverallStatus::Passed
}

/// Use-case service over a placement repository.
pub struct PlacementService<R: PlacementRepository> {
    repo: R,
}

impl<R: PlacementRepository> PlacementService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new student with an empty pipeline.
    ///
    /// # Errors
    /// - `InvalidArgument` when name or email is blank.
    pub fn register_student(&self, request: RegisterStudentRequest) -> CoreResult<StudentId> {
        let mut student = Student::new(request.name, request.email);
        student.contact = request.contact;
        student.institution = request.institution;
        student.program = request.program;
        student.grad_year = request.grad_year;
        student.skills = request.skills;
        student.certifications = request.certifications;

        student
            .validate()
            .map_err(|err| CoreError::InvalidArgument(err.to_string()))?;

        let id = self.repo.create_student(&student)?;
        info!("event=student_registered module=service status=ok student_id={id}");
        Ok(id)
    }

    /// Applies a partial profile edit.
    pub fn update_profile(&self, id: StudentId, update: ProfileUpdate) -> CoreResult<Student> {
        let mut student = self.require_student(id)?;

        if let Some(name) = update.name {
            student.name = name;
        }
        if let Some(email) = update.email {
            student.email = email;
        }
        if let Some(contact) = update.contact {
            student.contact = contact;
        }
        if let Some(institution) = update.institution {
            student.institution = institution;
        }
        if let Some(program) = update.program {
            student.program = program;
        }
        if let Some(grad_year) = update.grad_year {
            student.grad_year = grad_year;
        }
        if let Some(skills) = update.skills {
            student.skills = skills;
        }
        if let Some(certifications) = update.certifications {
            student.certifications = certifications;
        }

        student
            .validate()
            .map_err(|err| CoreError::InvalidArgument(err.to_string()))?;
        self.repo.save_student(&student)?;
        Ok(student)
    }

    /// Records one round outcome and immediately re-evaluates the pipeline.
    ///
    /// The slot for `kind` is overwritten wholesale; repeating the call with
    /// identical inputs reproduces identical derived state. The updated
    /// student and any emitted notifications commit in one transaction.
    ///
    /// # Errors
    /// - `InvalidArgument` when `score` is outside `[0, 100]`.
    /// - `NotFound` when no student has this id.
    pub fn record_round_result(
        &self,
        id: StudentId,
        kind: RoundKind,
        status: RoundStatus,
        score: i32,
    ) -> CoreResult<EvaluationOutcome> {
        if score < 0 || score > MAX_ROUND_SCORE {
            return Err(CoreError::InvalidArgument(format!(
                "round score {score} outside 0..={MAX_ROUND_SCORE}"
            )));
        }

        let mut student = self.require_student(id)?;
        student.pipeline.record(kind, RoundResult { status, score });
        let outcome = self.apply_evaluation(&mut student)?;
        info!(
            "event=round_recorded module=service status=ok student_id={id} round={kind:?} outcome={:?} overall={:?}",
            status, outcome.overall
        );
        Ok(outcome)
    }

    /// Re-derives overall status and score without a new round submission.
    ///
    /// Exposed separately from [`Self::record_round_result`] so the state
    /// machine can be exercised on its own. Re-evaluating a passed student
    /// emits nothing; re-evaluating a completed-but-failed student appends
    /// another feedback notification each time.
    pub fn evaluate_student(&self, id: StudentId) -> CoreResult<EvaluationOutcome> {
        let mut student = self.require_student(id)?;
        self.apply_evaluation(&mut student)
    }

    /// Records a company's interest in a verified student.
    ///
    /// Appends one shortlist entry plus two notifications (placement office
    /// and student) in a single transaction. Repeat shortlists are all kept.
    ///
    /// # Errors
    /// - `NotEligible` when the student's overall status is not `Passed`;
    ///   nothing is appended in that case.
    pub fn shortlist(
        &self,
        id: StudentId,
        company_id: &str,
        company_name: &str,
    ) -> CoreResult<ShortlistEntry> {
        let student = self.require_student(id)?;
        if !is_eligible_for_company_view(&student) {
            return Err(CoreError::NotEligible {
                student_id: id,
                overall: student.overall,
            });
        }

        let entry = ShortlistEntry::new(id, company_id);
        let notifications = [
            Notification::new(
                Recipient::PlacementOffice,
                id,
                format!("{} shortlisted by {company_name}", student.name),
            ),
            Notification::new(
                Recipient::Student(id),
                id,
                format!("You were shortlisted by {company_name}. Check with the placement office."),
            ),
        ];
        self.repo.commit_shortlist(&entry, &notifications)?;
        info!(
            "event=student_shortlisted module=service status=ok student_id={id} company_id={company_id}"
        );
        Ok(entry)
    }

    /// All students visible to companies (overall status `Passed`).
    pub fn company_pool(&self) -> CoreResult<Vec<Student>> {
        let query = StudentListQuery {
            overall: Some(OverallStatus::Passed),
        };
        Ok(self.repo.list_students(&query)?)
    }

    /// Builds the verified-report projection for a passed student.
    ///
    /// # Errors
    /// - `NotEligible` when the student has not passed all rounds.
    pub fn verified_report(&self, id: StudentId) -> CoreResult<VerifiedReport> {
        let student = self.require_student(id)?;
        if !is_eligible_for_company_view(&student) {
            return Err(CoreError::NotEligible {
                student_id: id,
                overall: student.overall,
            });
        }
        Ok(VerifiedReport::for_student(&student, now_epoch_ms()))
    }

    /// Gets one student by id.
    pub fn get_student(&self, id: StudentId) -> CoreResult<Student> {
        self.require_student(id)
    }

    /// Lists students with an optional overall-status filter.
    pub fn list_students(&self, query: &StudentListQuery) -> CoreResult<Vec<Student>> {
        Ok(self.repo.list_students(query)?)
    }

    /// Feed entries addressed to one recipient, newest first.
    pub fn notifications_for(&self, recipient: &Recipient) -> CoreResult<Vec<Notification>> {
        Ok(self.repo.notifications_for(recipient)?)
    }

    /// Shortlist entries recorded by one company, newest first.
    pub fn shortlists_for_company(&self, company_id: &str) -> CoreResult<Vec<ShortlistEntry>> {
        Ok(self.repo.shortlists_for_company(company_id)?)
    }

    /// Shortlist entries naming one student, newest first.
    pub fn shortlists_for_student(&self, id: StudentId) -> CoreResult<Vec<ShortlistEntry>> {
        Ok(self.repo.shortlists_for_student(id)?)
    }

    fn require_student(&self, id: StudentId) -> CoreResult<Student> {
        self.repo
            .get_student(id)?
            .ok_or(CoreError::NotFound(id))
    }

    /// Runs the evaluator against the stored previous status, materializes
    /// emissions into notifications and commits everything atomically.
    fn apply_evaluation(&self, student: &mut Student) -> CoreResult<EvaluationOutcome> {
        let previous = student.overall;
        let evaluation = evaluate(&student.pipeline, previous);
        student.overall = evaluation.overall;
        student.score = evaluation.score;

        let notifications: Vec<Notification> = evaluation
            .emissions
            .iter()
            .map(|emission| match emission {
                Emission::Verified => Notification::new(
                    Recipient::PlacementOffice,
                    student.id,
                    format!("{} verified and marked as passed", student.name),
                ),
                Emission::Feedback => Notification::new(
                    Recipient::Student(student.id),
                    student.id,
                    "Automated feedback: improve the rounds marked failed.",
                ),
            })
            .collect();

        self.repo.commit_evaluation(student, &notifications)?;
        if previous != evaluation.overall {
            info!(
                "event=pipeline_evaluated module=service status=ok student_id={} previous={previous:?} overall={:?} score={}",
                student.id, evaluation.overall, evaluation.score
            );
        }

        Ok(EvaluationOutcome {
            overall: evaluation.overall,
            score: evaluation.score,
            notifications,
        })
    }
}
