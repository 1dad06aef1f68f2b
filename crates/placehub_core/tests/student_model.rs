use placehub_core::{
    OverallStatus, RoundKind, RoundResult, RoundStatus, Student, StudentValidationError,
};

fn passed(score: i32) -> RoundResult {
    RoundResult {
        status: RoundStatus::Passed,
        score,
    }
}

#[test]
fn new_student_starts_pending_with_empty_pipeline() {
    let student = Student::new("Avery Lee", "avery@example.com");

    assert_eq!(student.overall, OverallStatus::Pending);
    assert_eq!(student.score, 0);
    for kind in RoundKind::ALL {
        assert_eq!(student.pipeline.slot(kind), None);
    }
    assert!(!student.pipeline.is_complete());
    assert!(student.validate().is_ok());
}

#[test]
fn validate_rejects_blank_name_and_email() {
    let mut student = Student::new(" ", "avery@example.com");
    assert_eq!(student.validate(), Err(StudentValidationError::EmptyName));

    student.name = "Avery Lee".to_string();
    student.email = "\t".to_string();
    assert_eq!(student.validate(), Err(StudentValidationError::EmptyEmail));
}

#[test]
fn validate_rejects_out_of_range_round_scores() {
    let mut student = Student::new("Avery Lee", "avery@example.com");
    student.pipeline.record(RoundKind::SoftSkills, passed(101));

    assert!(matches!(
        student.validate(),
        Err(StudentValidationError::ScoreOutOfRange {
            kind: RoundKind::SoftSkills,
            score: 101,
        })
    ));
}

#[test]
fn pipeline_completes_after_all_four_rounds() {
    let mut student = Student::new("Avery Lee", "avery@example.com");
    for kind in RoundKind::ALL {
        assert!(!student.pipeline.is_complete());
        student.pipeline.record(kind, passed(75));
    }
    assert!(student.pipeline.is_complete());
    assert_eq!(student.pipeline.attempted().count(), 4);
}

#[test]
fn round_kinds_serialize_as_snake_case() {
    let json = serde_json::to_string(&RoundKind::BackgroundCheck).unwrap();
    assert_eq!(json, "\"background_check\"");

    let status = serde_json::to_string(&OverallStatus::InProgress).unwrap();
    assert_eq!(status, "\"in_progress\"");
}
