use axum::http::StatusCode;
use eyre::WrapErr;
use nest_api::middleware::error_handling::{
    conflict_on_duplicate, is_unique_violation, map_error, AppError,
};
use nest_core::errors::NestError;
use rstest::rstest;

use crate::test_utils::duplicate_key_report;

#[rstest]
#[case(NestError::NotFound("Course CS101 not found".to_string()), StatusCode::NOT_FOUND)]
#[case(NestError::Validation("Invalid reservation time.".to_string()), StatusCode::BAD_REQUEST)]
#[case(NestError::InvalidArgument("Invalid time '25:00'".to_string()), StatusCode::BAD_REQUEST)]
#[case(NestError::Conflict("The selected time is fully booked.".to_string()), StatusCode::CONFLICT)]
#[case(NestError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: NestError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = NestError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(NestError::Conflict(
        "The selected time is fully booked.".to_string(),
    ));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(
        body["error"],
        "Conflict: The selected time is fully booked."
    );
}

#[test]
fn test_eyre_reports_become_database_errors() {
    let error = AppError::from(eyre::eyre!("pool timed out"));

    assert!(matches!(error.0, NestError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_duplicate_key_becomes_conflict() {
    let error = AppError::from(duplicate_key_report());

    assert!(matches!(error.0, NestError::Conflict(_)));
    assert_eq!(error.status(), StatusCode::CONFLICT);
}

#[test]
fn test_duplicate_key_is_found_behind_context() {
    let report: eyre::Result<()> = Err(duplicate_key_report());
    let report = report.wrap_err("inserting user").unwrap_err();

    assert!(is_unique_violation(&report));
    assert!(!is_unique_violation(&eyre::eyre!("duplicate key")));
}

#[test]
fn test_conflict_on_duplicate_uses_given_message() {
    let error = conflict_on_duplicate("User already exists")(duplicate_key_report());
    match error.0 {
        NestError::Conflict(message) => assert_eq!(message, "User already exists"),
        e => panic!("Expected Conflict error, got: {:?}", e),
    }

    let error = conflict_on_duplicate("User already exists")(eyre::eyre!("pool timed out"));
    assert!(matches!(error.0, NestError::Database(_)));
}
