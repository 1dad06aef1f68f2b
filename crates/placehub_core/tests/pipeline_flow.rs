use placehub_core::db::open_db_in_memory;
use placehub_core::{
    is_eligible_for_company_view, CoreError, OverallStatus, PlacementService, ProfileUpdate,
    Recipient, RegisterStudentRequest, RoundKind, RoundStatus, SqlitePlacementRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn service(conn: &Connection) -> PlacementService<SqlitePlacementRepository<'_>> {
    PlacementService::new(SqlitePlacementRepository::new(conn))
}

fn register(service: &PlacementService<SqlitePlacementRepository<'_>>) -> Uuid {
    service
        .register_student(RegisterStudentRequest {
            name: "Priya Sharma".to_string(),
            email: "priya@example.com".to_string(),
            institution: "Demo Institute".to_string(),
            program: "B.Tech".to_string(),
            grad_year: "2024".to_string(),
            skills: vec!["Rust".to_string(), "Algorithms".to_string()],
            ..RegisterStudentRequest::default()
        })
        .unwrap()
}

fn pass_all_rounds(service: &PlacementService<SqlitePlacementRepository<'_>>, id: Uuid) {
    for (kind, score) in [
        (RoundKind::Coding, 90),
        (RoundKind::Aptitude, 85),
        (RoundKind::SoftSkills, 80),
        (RoundKind::BackgroundCheck, 70),
    ] {
        service
            .record_round_result(id, kind, RoundStatus::Passed, score)
            .unwrap();
    }
}

#[test]
fn registration_rejects_blank_required_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .register_student(RegisterStudentRequest {
            name: "  ".to_string(),
            email: "someone@example.com".to_string(),
            ..RegisterStudentRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));

    let err = service
        .register_student(RegisterStudentRequest {
            name: "Someone".to_string(),
            ..RegisterStudentRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));
}

#[test]
fn single_passed_round_leaves_student_in_progress() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);

    let outcome = service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Passed, 90)
        .unwrap();

    assert_eq!(outcome.overall, OverallStatus::InProgress);
    assert_eq!(outcome.score, 90);
    assert!(outcome.notifications.is_empty());

    let student = service.get_student(id).unwrap();
    assert_eq!(student.overall, OverallStatus::InProgress);
    assert_eq!(student.score, 90);
    assert!(!is_eligible_for_company_view(&student));
}

#[test]
fn passing_all_rounds_verifies_the_student_exactly_once() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);

    pass_all_rounds(&service, id);

    let student = service.get_student(id).unwrap();
    assert_eq!(student.overall, OverallStatus::Passed);
    assert_eq!(student.score, 81);
    assert!(is_eligible_for_company_view(&student));

    let office_feed = service
        .notifications_for(&Recipient::PlacementOffice)
        .unwrap();
    assert_eq!(office_feed.len(), 1);
    assert!(office_feed[0].message.contains("Priya Sharma"));
    assert_eq!(office_feed[0].student_id, id);

    // Re-evaluation of an already-passed student must not re-emit.
    let outcome = service.evaluate_student(id).unwrap();
    assert_eq!(outcome.overall, OverallStatus::Passed);
    assert!(outcome.notifications.is_empty());
    assert_eq!(
        service
            .notifications_for(&Recipient::PlacementOffice)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn failed_retake_flips_passed_student_to_failed_with_feedback() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);
    pass_all_rounds(&service, id);

    let outcome = service
        .record_round_result(id, RoundKind::BackgroundCheck, RoundStatus::Failed, 40)
        .unwrap();

    assert_eq!(outcome.overall, OverallStatus::Failed);
    assert_eq!(outcome.score, 74);
    assert_eq!(outcome.notifications.len(), 1);
    assert_eq!(outcome.notifications[0].recipient, Recipient::Student(id));

    let feed = service.notifications_for(&Recipient::Student(id)).unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.contains("feedback"));
}

#[test]
fn reevaluating_a_failed_student_appends_feedback_each_time() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);
    pass_all_rounds(&service, id);
    service
        .record_round_result(id, RoundKind::Aptitude, RoundStatus::Failed, 30)
        .unwrap();

    service.evaluate_student(id).unwrap();
    service.evaluate_student(id).unwrap();

    let feed = service.notifications_for(&Recipient::Student(id)).unwrap();
    assert_eq!(feed.len(), 3);
    assert!(feed.iter().all(|n| n.recipient == Recipient::Student(id)));
}

#[test]
fn failing_rounds_with_outstanding_ones_stays_in_progress() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);

    service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Failed, 20)
        .unwrap();
    let outcome = service
        .record_round_result(id, RoundKind::Aptitude, RoundStatus::Failed, 25)
        .unwrap();

    assert_eq!(outcome.overall, OverallStatus::InProgress);
    assert!(outcome.notifications.is_empty());
    assert!(service
        .notifications_for(&Recipient::Student(id))
        .unwrap()
        .is_empty());
}

#[test]
fn out_of_range_score_is_rejected_without_touching_state() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);

    let err = service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Passed, 101)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));

    let err = service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Passed, -1)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));

    let student = service.get_student(id).unwrap();
    assert_eq!(student.overall, OverallStatus::Pending);
    assert_eq!(student.pipeline.slot(RoundKind::Coding), None);
}

#[test]
fn operations_on_unknown_students_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let ghost = Uuid::new_v4();

    assert!(matches!(
        service.record_round_result(ghost, RoundKind::Coding, RoundStatus::Passed, 50),
        Err(CoreError::NotFound(id)) if id == ghost
    ));
    assert!(matches!(
        service.evaluate_student(ghost),
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        service.shortlist(ghost, "acme", "Acme Corp"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn shortlist_requires_a_passed_student_and_leaves_no_residue_on_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);
    service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Passed, 90)
        .unwrap();

    let err = service.shortlist(id, "acme", "Acme Corp").unwrap_err();
    assert!(matches!(
        err,
        CoreError::NotEligible {
            overall: OverallStatus::InProgress,
            ..
        }
    ));
    assert!(service.shortlists_for_company("acme").unwrap().is_empty());
    assert!(service
        .notifications_for(&Recipient::PlacementOffice)
        .unwrap()
        .is_empty());
}

#[test]
fn shortlisting_a_verified_student_notifies_both_feeds() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);
    pass_all_rounds(&service, id);

    let entry = service.shortlist(id, "acme", "Acme Corp").unwrap();
    assert_eq!(entry.student_id, id);
    assert_eq!(entry.company_id, "acme");

    let office_feed = service
        .notifications_for(&Recipient::PlacementOffice)
        .unwrap();
    // Verified notification plus the shortlist announcement.
    assert_eq!(office_feed.len(), 2);
    assert!(office_feed
        .iter()
        .any(|n| n.message.contains("shortlisted by Acme Corp")));

    let personal = service.notifications_for(&Recipient::Student(id)).unwrap();
    assert_eq!(personal.len(), 1);
    assert!(personal[0].message.contains("Acme Corp"));

    // Shortlisting twice is allowed and recorded both times.
    service.shortlist(id, "acme", "Acme Corp").unwrap();
    assert_eq!(service.shortlists_for_company("acme").unwrap().len(), 2);
}

#[test]
fn company_pool_contains_only_passed_students() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let verified = register(&service);
    pass_all_rounds(&service, verified);

    let in_progress = service
        .register_student(RegisterStudentRequest {
            name: "Rohan Gupta".to_string(),
            email: "rohan@example.com".to_string(),
            ..RegisterStudentRequest::default()
        })
        .unwrap();
    service
        .record_round_result(in_progress, RoundKind::Coding, RoundStatus::Passed, 95)
        .unwrap();

    let pool = service.company_pool().unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].id, verified);
}

#[test]
fn verified_report_is_gated_on_passed_status() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);

    assert!(matches!(
        service.verified_report(id),
        Err(CoreError::NotEligible { .. })
    ));

    pass_all_rounds(&service, id);
    let report = service.verified_report(id).unwrap();
    assert_eq!(report.student.id, id);
    assert_eq!(report.overall, OverallStatus::Passed);
    assert_eq!(report.score, 81);

    let json = report.to_json_pretty().unwrap();
    assert!(json.contains("\"name\": \"Priya Sharma\""));
    assert!(json.contains("\"overall\": \"passed\""));
}

#[test]
fn profile_update_edits_fields_without_touching_the_pipeline() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = register(&service);
    service
        .record_round_result(id, RoundKind::Coding, RoundStatus::Passed, 90)
        .unwrap();

    let updated = service
        .update_profile(
            id,
            ProfileUpdate {
                contact: Some("9999999999".to_string()),
                skills: Some(vec!["Rust".to_string(), "Rust".to_string()]),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.contact, "9999999999");
    // Duplicates are allowed; the list is stored as given.
    assert_eq!(updated.skills.len(), 2);
    assert_eq!(updated.overall, OverallStatus::InProgress);
    assert_eq!(updated.score, 90);

    let err = service
        .update_profile(
            id,
            ProfileUpdate {
                name: Some(String::new()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));
}
