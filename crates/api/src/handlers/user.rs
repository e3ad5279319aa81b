use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::{
        course::Course,
        user::{CreateUserResponse, UserCourses, UserInfo, UserQuery, UserResponse},
    },
};
use nest_db::repositories::{
    course as course_repo, professor as professor_repo, student as student_repo,
    user as user_repo,
};
use nest_db::UNKNOWN_NAME;
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::{conflict_on_duplicate, AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<UserInfo>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let existing = user_repo::find_user_by_github_or_student_id(
        &state.db_pool,
        &payload.github_id,
        &payload.student_id,
    )
    .await?;

    if existing.is_some() {
        return Err(AppError(NestError::Conflict(
            "User with this GitHub ID or Student ID already exists".to_string(),
        )));
    }

    let user = user_repo::create_user(&state.db_pool, &payload)
        .await
        .map_err(conflict_on_duplicate(
            "User with this GitHub ID or Student ID already exists",
        ))?;
    info!("Registered user {} ({})", user.github_username, user.github_id);

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User info saved successfully".to_string(),
            github_id: user.github_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn get_user_name(
    State(state): State<Arc<ApiState>>,
    AppJson(query): AppJson<UserQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_repo::get_user_by_github_username(&state.db_pool, &query.github_username)
        .await?
        .ok_or_else(|| NestError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        name: user.name,
        github_id: user.github_id,
        student_id: user.student_id,
    }))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    AppPath(github_id): AppPath<String>,
) -> Result<Json<UserInfo>, AppError> {
    let user = user_repo::get_user_by_github_id(&state.db_pool, &github_id)
        .await?
        .ok_or_else(|| NestError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Dashboard courses of a student, or of a professor when the username is
/// not a known GitHub user.
#[axum::debug_handler]
pub async fn get_user_courses(
    State(state): State<Arc<ApiState>>,
    AppJson(query): AppJson<UserQuery>,
) -> Result<Json<UserCourses>, AppError> {
    if let Some(user) = user_repo::get_user_by_github_username(&state.db_pool, &query.github_username).await? {
        let student = student_repo::get_student_by_id(&state.db_pool, &user.student_id)
            .await?
            .ok_or_else(|| NestError::NotFound("Student not found".to_string()))?;

        let courses = course_repo::get_courses_by_codes(&state.db_pool, &student.course_codes).await?;

        return Ok(Json(UserCourses::Student {
            name: user.name,
            github_username: user.github_username,
            student_id: student.student_id,
            department: student.department,
            courses: courses.into_iter().map(Course::from).collect(),
        }));
    }

    let email = query.github_username;
    let professor = professor_repo::get_professor_by_email(&state.db_pool, &email)
        .await?
        .ok_or_else(|| NestError::NotFound("Professor not found".to_string()))?;

    let courses = course_repo::get_courses_by_professor(&state.db_pool, &professor.professor_id).await?;

    Ok(Json(UserCourses::Professor {
        name: professor.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        email: professor.email,
        professor_id: professor.professor_id,
        courses: courses.into_iter().map(Course::from).collect(),
    }))
}
