//! Placement storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable student/notification/shortlist persistence APIs.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Student::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `commit_evaluation` and `commit_shortlist` apply all of their writes in
//!   a single immediate transaction.

use crate::db::DbError;
use crate::model::notification::{Notification, Recipient};
use crate::model::shortlist::ShortlistEntry;
use crate::model::student::{
    OverallStatus, Pipeline, RoundKind, RoundResult, RoundStatus, Student, StudentId,
    StudentValidationError,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    contact,
    institution,
    program,
    grad_year,
    skills,
    certifications,
    overall,
    score,
    created_at
FROM students";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for placement persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    NotFound(StudentId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted placement data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing students.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentListQuery {
    /// Restrict to one overall status (e.g. `Passed` for the company pool).
    pub overall: Option<OverallStatus>,
}

/// Storage collaborator the placement core depends on.
///
/// `commit_evaluation` carries the central durability contract: a student
/// update and the notifications produced by the same evaluation are applied
/// together or not at all.
pub trait PlacementRepository {
    fn create_student(&self, student: &Student) -> RepoResult<StudentId>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn save_student(&self, student: &Student) -> RepoResult<()>;
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>>;
    /// Persists the updated student together with the notifications emitted
    /// by one evaluation, atomically.
    fn commit_evaluation(
        &self,
        student: &Student,
        notifications: &[Notification],
    ) -> RepoResult<()>;
    /// Persists a shortlist entry together with its notifications, atomically.
    fn commit_shortlist(
        &self,
        entry: &ShortlistEntry,
        notifications: &[Notification],
    ) -> RepoResult<()>;
    fn append_notification(&self, notification: &Notification) -> RepoResult<()>;
    fn notifications_for(&self, recipient: &Recipient) -> RepoResult<Vec<Notification>>;
    fn append_shortlist(&self, entry: &ShortlistEntry) -> RepoResult<()>;
    fn shortlists_for_company(&self, company_id: &str) -> RepoResult<Vec<ShortlistEntry>>;
    fn shortlists_for_student(&self, id: StudentId) -> RepoResult<Vec<ShortlistEntry>>;
}

/// SQLite-backed placement repository.
pub struct SqlitePlacementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlacementRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn immediate_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl PlacementRepository for SqlitePlacementRepository<'_> {
    fn create_student(&self, student: &Student) -> RepoResult<StudentId> {
        student.validate()?;

        let tx = self.immediate_tx()?;
        tx.execute(
            "INSERT INTO students (
                id,
                name,
                email,
                contact,
                institution,
                program,
                grad_year,
                skills,
                certifications,
                overall,
                score,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                student.id.to_string(),
                student.name.as_str(),
                student.email.as_str(),
                student.contact.as_str(),
                student.institution.as_str(),
                student.program.as_str(),
                student.grad_year.as_str(),
                string_list_to_db(&student.skills)?,
                string_list_to_db(&student.certifications)?,
                overall_to_db(student.overall),
                student.score,
                student.created_at_ms,
            ],
        )?;
        upsert_rounds(&tx, student)?;
        tx.commit()?;

        Ok(student.id)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut student = parse_student_row(row)?;
            student.pipeline = load_pipeline(self.conn, student.id)?;
            return Ok(Some(student));
        }

        Ok(None)
    }

    fn save_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;

        let tx = self.immediate_tx()?;
        update_student_row(&tx, student)?;
        upsert_rounds(&tx, student)?;
        tx.commit()?;

        Ok(())
    }

    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        let mut sql = format!("{STUDENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(overall) = query.overall {
            sql.push_str(" AND overall = ?");
            bind_values.push(overall_to_db(overall).to_string());
        }

        sql.push_str(" ORDER BY created_at ASC, id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(bind_values))?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        for student in &mut students {
            student.pipeline = load_pipeline(self.conn, student.id)?;
        }

        Ok(students)
    }

    fn commit_evaluation(
        &self,
        student: &Student,
        notifications: &[Notification],
    ) -> RepoResult<()> {
        student.validate()?;

        let tx = self.immediate_tx()?;
        update_student_row(&tx, student)?;
        upsert_rounds(&tx, student)?;
        for notification in notifications {
            insert_notification(&tx, notification)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn commit_shortlist(
        &self,
        entry: &ShortlistEntry,
        notifications: &[Notification],
    ) -> RepoResult<()> {
        let tx = self.immediate_tx()?;
        insert_shortlist(&tx, entry)?;
        for notification in notifications {
            insert_notification(&tx, notification)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn append_notification(&self, notification: &Notification) -> RepoResult<()> {
        insert_notification(self.conn, notification)
    }

    fn notifications_for(&self, recipient: &Recipient) -> RepoResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recipient, student_id, message, created_at
             FROM notifications
             WHERE recipient = ?1
             ORDER BY created_at DESC, id ASC;",
        )?;

        let mut rows = stmt.query(params![recipient_to_db(recipient)])?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }

        Ok(notifications)
    }

    fn append_shortlist(&self, entry: &ShortlistEntry) -> RepoResult<()> {
        insert_shortlist(self.conn, entry)
    }

    fn shortlists_for_company(&self, company_id: &str) -> RepoResult<Vec<ShortlistEntry>> {
        query_shortlists(self.conn, "company_id = ?1", company_id.to_string())
    }

    fn shortlists_for_student(&self, id: StudentId) -> RepoResult<Vec<ShortlistEntry>> {
        query_shortlists(self.conn, "student_id = ?1", id.to_string())
    }
}

fn update_student_row(conn: &Connection, student: &Student) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE students
         SET
            name = ?1,
            email = ?2,
            contact = ?3,
            institution = ?4,
            program = ?5,
            grad_year = ?6,
            skills = ?7,
            certifications = ?8,
            overall = ?9,
            score = ?10
         WHERE id = ?11;",
        params![
            student.name.as_str(),
            student.email.as_str(),
            student.contact.as_str(),
            student.institution.as_str(),
            student.program.as_str(),
            student.grad_year.as_str(),
            string_list_to_db(&student.skills)?,
            string_list_to_db(&student.certifications)?,
            overall_to_db(student.overall),
            student.score,
            student.id.to_string(),
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound(student.id));
    }

    Ok(())
}

fn upsert_rounds(conn: &Connection, student: &Student) -> RepoResult<()> {
    for (kind, result) in student.pipeline.attempted() {
        conn.execute(
            "INSERT INTO pipeline_rounds (student_id, round, status, score)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (student_id, round) DO UPDATE SET
                status = excluded.status,
                score = excluded.score;",
            params![
                student.id.to_string(),
                round_kind_to_db(kind),
                round_status_to_db(result.status),
                result.score,
            ],
        )?;
    }
    Ok(())
}

fn load_pipeline(conn: &Connection, id: StudentId) -> RepoResult<Pipeline> {
    let mut stmt = conn.prepare(
        "SELECT round, status, score
         FROM pipeline_rounds
         WHERE student_id = ?1;",
    )?;

    let mut rows = stmt.query(params![id.to_string()])?;
    let mut pipeline = Pipeline::default();
    while let Some(row) = rows.next()? {
        let round_text: String = row.get("round")?;
        let kind = parse_round_kind(&round_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid round kind `{round_text}` in pipeline_rounds.round"
            ))
        })?;
        let status_text: String = row.get("status")?;
        let status = parse_round_status(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid round status `{status_text}` in pipeline_rounds.status"
            ))
        })?;
        pipeline.record(
            kind,
            RoundResult {
                status,
                score: row.get("score")?,
            },
        );
    }

    Ok(pipeline)
}

fn insert_notification(conn: &Connection, notification: &Notification) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO notifications (id, recipient, student_id, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            notification.id.to_string(),
            recipient_to_db(&notification.recipient),
            notification.student_id.to_string(),
            notification.message.as_str(),
            notification.created_at_ms,
        ],
    )?;
    Ok(())
}

fn insert_shortlist(conn: &Connection, entry: &ShortlistEntry) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO shortlists (id, student_id, company_id, created_at)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            entry.id.to_string(),
            entry.student_id.to_string(),
            entry.company_id.as_str(),
            entry.created_at_ms,
        ],
    )?;
    Ok(())
}

fn query_shortlists(
    conn: &Connection,
    filter: &str,
    bind: String,
) -> RepoResult<Vec<ShortlistEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, student_id, company_id, created_at
         FROM shortlists
         WHERE {filter}
         ORDER BY created_at DESC, id ASC;"
    ))?;

    let mut rows = stmt.query(params![bind])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(ShortlistEntry {
            id: parse_uuid(row, "id")?,
            student_id: parse_uuid(row, "student_id")?,
            company_id: row.get("company_id")?,
            created_at_ms: row.get("created_at")?,
        });
    }

    Ok(entries)
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let overall_text: String = row.get("overall")?;
    let overall = parse_overall(&overall_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid overall status `{overall_text}` in students.overall"
        ))
    })?;

    Ok(Student {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        contact: row.get("contact")?,
        institution: row.get("institution")?,
        program: row.get("program")?,
        grad_year: row.get("grad_year")?,
        skills: string_list_from_db(&row.get::<_, String>("skills")?, "students.skills")?,
        certifications: string_list_from_db(
            &row.get::<_, String>("certifications")?,
            "students.certifications",
        )?,
        pipeline: Pipeline::default(),
        overall,
        score: row.get("score")?,
        created_at_ms: row.get("created_at")?,
    })
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let recipient_text: String = row.get("recipient")?;
    let recipient = parse_recipient(&recipient_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid recipient `{recipient_text}` in notifications.recipient"
        ))
    })?;

    Ok(Notification {
        id: parse_uuid(row, "id")?,
        recipient,
        student_id: parse_uuid(row, "student_id")?,
        message: row.get("message")?,
        created_at_ms: row.get("created_at")?,
    })
}

fn parse_uuid(row: &Row<'_>, column: &'static str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn string_list_to_db(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode string list: {err}")))
}

fn string_list_from_db(raw: &str, column: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|_| RepoError::InvalidData(format!("invalid string list `{raw}` in {column}")))
}

fn overall_to_db(overall: OverallStatus) -> &'static str {
    match overall {
        OverallStatus::Pending => "pending",
        OverallStatus::InProgress => "in_progress",
        OverallStatus::Passed => "passed",
        OverallStatus::Failed => "failed",
    }
}

fn parse_overall(value: &str) -> Option<OverallStatus> {
    match value {
        "pending" => Some(OverallStatus::Pending),
        "in_progress" => Some(OverallStatus::InProgress),
        "passed" => Some(OverallStatus::Passed),
        "failed" => Some(OverallStatus::Failed),
        _ => None,
    }
}

fn round_kind_to_db(kind: RoundKind) -> &'static str {
    match kind {
        RoundKind::Coding => "coding",
        RoundKind::Aptitude => "aptitude",
        RoundKind::SoftSkills => "soft_skills",
        RoundKind::BackgroundCheck => "background_check",
    }
}

fn parse_round_kind(value: &str) -> Option<RoundKind> {
    match value {
        "coding" => Some(RoundKind::Coding),
        "aptitude" => Some(RoundKind::Aptitude),
        "soft_skills" => Some(RoundKind::SoftSkills),
        "background_check" => Some(RoundKind::BackgroundCheck),
        _ => None,
    }
}

fn round_status_to_db(status: RoundStatus) -> &'static str {
    match status {
        RoundStatus::Passed => "passed",
        RoundStatus::Failed => "failed",
    }
}

fn parse_round_status(value: &str) -> Option<RoundStatus> {
    match value {
        "passed" => Some(RoundStatus::Passed),
        "failed" => Some(RoundStatus::Failed),
        _ => None,
    }
}

const PLACEMENT_RECIPIENT_DB: &str = "placement";

fn recipient_to_db(recipient: &Recipient) -> String {
    match recipient {
        Recipient::PlacementOffice => PLACEMENT_RECIPIENT_DB.to_string(),
        Recipient::Student(id) => id.to_string(),
    }
}

fn parse_recipient(value: &str) -> Option<Recipient> {
    if value == PLACEMENT_RECIPIENT_DB {
        return Some(Recipient::PlacementOffice);
    }
    Uuid::parse_str(value).ok().map(Recipient::Student)
}
