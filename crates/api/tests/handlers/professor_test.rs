use axum::{http::StatusCode, Json};
use chrono::Utc;
use mockall::predicate::eq;
use nest_api::middleware::error_handling::{conflict_on_duplicate, AppError};
use nest_core::{
    errors::NestError,
    models::professor::{RegisterProfessorRequest, RegisterProfessorResponse},
};
use nest_db::models::DbProfessor;
use pretty_assertions::assert_eq;

use crate::test_utils::{duplicate_key_report, TestContext};

// Registration flow of the professor handler with the repositories mocked out.
async fn test_register_professor_wrapper(
    ctx: &mut TestContext,
    request: RegisterProfessorRequest,
) -> Result<(StatusCode, Json<RegisterProfessorResponse>), AppError> {
    if ctx
        .course_repo
        .get_professor_name(request.professor_id.clone())
        .await?
        .is_none()
    {
        return Err(AppError(NestError::Validation(
            "Professor with this ID does not exist in any course.".to_string(),
        )));
    }

    if ctx
        .professor_repo
        .get_professor_by_email(request.email.clone())
        .await?
        .is_some()
    {
        return Err(AppError(NestError::Conflict(
            "Professor with this email already exists.".to_string(),
        )));
    }

    let professor = ctx
        .professor_repo
        .create_professor(request.professor_id, request.email, request.name)
        .await
        .map_err(conflict_on_duplicate(
            "Professor with this email or ID is already registered.",
        ))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterProfessorResponse {
            message: "Professor registered successfully".to_string(),
            professor_id: professor.professor_id,
        }),
    ))
}

fn request() -> RegisterProfessorRequest {
    RegisterProfessorRequest {
        email: "lee@nest.example.edu".to_string(),
        professor_id: "P-100".to_string(),
        name: Some("Lee".to_string()),
    }
}

fn professor() -> DbProfessor {
    DbProfessor {
        professor_id: "P-100".to_string(),
        email: "lee@nest.example.edu".to_string(),
        name: Some("Lee".to_string()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_register_professor_success() {
    let mut ctx = TestContext::new();
    ctx.course_repo
        .expect_get_professor_name()
        .with(eq("P-100".to_string()))
        .returning(|_| Ok(Some("Lee".to_string())));
    ctx.professor_repo
        .expect_get_professor_by_email()
        .returning(|_| Ok(None));
    ctx.professor_repo
        .expect_create_professor()
        .times(1)
        .returning(|_, _, _| Ok(professor()));

    let (status, response) = test_register_professor_wrapper(&mut ctx, request())
        .await
        .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.0.professor_id, "P-100");
}

#[tokio::test]
async fn test_register_professor_without_course() {
    let mut ctx = TestContext::new();
    ctx.course_repo
        .expect_get_professor_name()
        .returning(|_| Ok(None));
    ctx.professor_repo.expect_create_professor().never();

    let result = test_register_professor_wrapper(&mut ctx, request()).await;

    assert!(matches!(result.unwrap_err().0, NestError::Validation(_)));
}

#[tokio::test]
async fn test_register_professor_losing_insert_race_conflicts() {
    let mut ctx = TestContext::new();
    ctx.course_repo
        .expect_get_professor_name()
        .returning(|_| Ok(Some("Lee".to_string())));
    // The lookup saw no row, but a concurrent request inserted first.
    ctx.professor_repo
        .expect_get_professor_by_email()
        .returning(|_| Ok(None));
    ctx.professor_repo
        .expect_create_professor()
        .returning(|_, _, _| Err(duplicate_key_report()));

    let error = test_register_professor_wrapper(&mut ctx, request())
        .await
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::CONFLICT);
    match error.0 {
        NestError::Conflict(message) => {
            assert_eq!(message, "Professor with this email or ID is already registered.")
        }
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}
