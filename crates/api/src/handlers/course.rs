use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::course::{
        Course, CourseCode, CourseWithStudents, DeleteCoursesResponse, SaveCoursesResponse,
    },
};
use nest_db::repositories::{course as course_repo, student as student_repo};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::{conflict_on_duplicate, AppError},
    ApiState,
};

/// Returns the first code that appears twice in a batch.
pub fn find_repeated_code(courses: &[Course]) -> Option<&str> {
    let mut seen = HashSet::new();
    courses
        .iter()
        .map(|course| course.code.as_str())
        .find(|code| !seen.insert(*code))
}

#[axum::debug_handler]
pub async fn save_courses(
    State(state): State<Arc<ApiState>>,
    AppJson(courses): AppJson<Vec<Course>>,
) -> Result<Json<SaveCoursesResponse>, AppError> {
    if courses.is_empty() {
        return Err(AppError(NestError::Validation(
            "At least one course is required".to_string(),
        )));
    }

    if let Some(code) = find_repeated_code(&courses) {
        return Err(AppError(NestError::Conflict(format!(
            "Course code {} appears more than once",
            code
        ))));
    }

    let codes: Vec<String> = courses.iter().map(|course| course.code.clone()).collect();
    let existing = course_repo::find_existing_codes(&state.db_pool, &codes).await?;
    if !existing.is_empty() {
        return Err(AppError(NestError::Conflict(format!(
            "Course code already exists: {}",
            existing.join(", ")
        ))));
    }

    course_repo::insert_courses(&state.db_pool, &courses)
        .await
        .map_err(conflict_on_duplicate("Course code already exists"))?;
    info!("Saved {} courses", courses.len());

    Ok(Json(SaveCoursesResponse {
        message: "Courses saved successfully".to_string(),
        saved: courses.len(),
    }))
}

#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = course_repo::list_courses(&state.db_pool).await?;

    Ok(Json(courses.into_iter().map(Course::from).collect()))
}

#[axum::debug_handler]
pub async fn get_course(
    State(state): State<Arc<ApiState>>,
    AppPath(code): AppPath<String>,
) -> Result<Json<Course>, AppError> {
    let course = course_repo::get_course_by_code(&state.db_pool, &code)
        .await?
        .ok_or_else(|| NestError::NotFound(format!("Course {} not found", code)))?;

    Ok(Json(course.into()))
}

#[axum::debug_handler]
pub async fn get_course_students(
    State(state): State<Arc<ApiState>>,
    AppPath(code): AppPath<String>,
) -> Result<Json<CourseWithStudents>, AppError> {
    let course = course_repo::get_course_by_code(&state.db_pool, &code)
        .await?
        .ok_or_else(|| NestError::NotFound(format!("Course {} not found", code)))?;

    let students = student_repo::list_students(&state.db_pool, Some(&code)).await?;

    Ok(Json(CourseWithStudents {
        course: course.into(),
        students: students.into_iter().map(Into::into).collect(),
    }))
}

#[axum::debug_handler]
pub async fn get_professor_courses(
    State(state): State<Arc<ApiState>>,
    AppPath(professor_id): AppPath<String>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = course_repo::get_courses_by_professor(&state.db_pool, &professor_id).await?;

    if courses.is_empty() {
        return Err(AppError(NestError::NotFound(
            "No courses found for the professor".to_string(),
        )));
    }

    Ok(Json(courses.into_iter().map(Course::from).collect()))
}

#[axum::debug_handler]
pub async fn delete_courses(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<Vec<CourseCode>>,
) -> Result<Json<DeleteCoursesResponse>, AppError> {
    let codes: Vec<String> = payload.into_iter().map(|course| course.code).collect();
    let deleted = course_repo::delete_courses(&state.db_pool, &codes).await?;

    info!("Deleted {} of {} requested courses", deleted, codes.len());

    Ok(Json(DeleteCoursesResponse {
        message: "Courses deleted successfully".to_string(),
        deleted,
    }))
}
