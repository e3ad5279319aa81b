use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::{
        course::{
            Course, EnrollStudentRequest, EnrollmentSummary, Student, StudentCourses,
            StudentFilter, UnenrollStudentRequest,
        },
        MessageResponse,
    },
    roster::plan_enrollment,
};
use nest_db::repositories::{course as course_repo, student as student_repo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::{AppJson, AppPath, AppQuery},
    middleware::error_handling::{conflict_on_duplicate, AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_student(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<Student>,
) -> Result<Json<Student>, AppError> {
    if payload.student_id.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Student id is required".to_string(),
        )));
    }

    if student_repo::get_student_by_id(&state.db_pool, &payload.student_id)
        .await?
        .is_some()
    {
        return Err(AppError(NestError::Conflict(format!(
            "Student {} already exists",
            payload.student_id
        ))));
    }

    let student = student_repo::create_student(
        &state.db_pool,
        &payload.student_id,
        &payload.name,
        &payload.department,
        &payload.course_codes,
    )
    .await
    .map_err(conflict_on_duplicate("Student already exists"))?;

    Ok(Json(student.into()))
}

/// Uploads a course roster: one row per student and course.
#[axum::debug_handler]
pub async fn enroll_students(
    State(state): State<Arc<ApiState>>,
    AppJson(rows): AppJson<Vec<EnrollStudentRequest>>,
) -> Result<Json<EnrollmentSummary>, AppError> {
    let mut ids: Vec<String> = rows.iter().map(|row| row.student_id.clone()).collect();
    ids.sort();
    ids.dedup();

    let existing: HashMap<String, Vec<String>> = student_repo::get_students_by_ids(&state.db_pool, &ids)
        .await?
        .into_iter()
        .map(|student| (student.student_id, student.course_codes))
        .collect();

    let plan = plan_enrollment(&existing, &rows);
    student_repo::apply_enrollment(&state.db_pool, &plan).await?;

    let summary = EnrollmentSummary {
        message: "Students saved successfully".to_string(),
        created: plan.create.len(),
        updated: plan.updated_students(),
        duplicates: plan.duplicates,
    };
    info!(
        "Roster upload: created={}, updated={}, duplicates={}",
        summary.created,
        summary.updated,
        summary.duplicates.len()
    );

    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn unenroll_students(
    State(state): State<Arc<ApiState>>,
    AppJson(rows): AppJson<Vec<UnenrollStudentRequest>>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut removed = 0;
    for row in &rows {
        removed += student_repo::remove_course_code(&state.db_pool, &row.student_id, &row.course_code).await?;
    }

    info!("Unenrolled {} of {} listed students", removed, rows.len());

    Ok(Json(MessageResponse::new("Students removed from courses")))
}

#[axum::debug_handler]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
    AppQuery(filter): AppQuery<StudentFilter>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = student_repo::list_students(&state.db_pool, filter.course_code.as_deref()).await?;

    Ok(Json(students.into_iter().map(Student::from).collect()))
}

#[axum::debug_handler]
pub async fn get_student_courses(
    State(state): State<Arc<ApiState>>,
    AppPath(student_id): AppPath<String>,
) -> Result<Json<StudentCourses>, AppError> {
    let student = student_repo::get_student_by_id(&state.db_pool, &student_id)
        .await?
        .ok_or_else(|| NestError::NotFound(format!("Student {} not found", student_id)))?;

    let courses = course_repo::get_courses_by_codes(&state.db_pool, &student.course_codes).await?;

    Ok(Json(StudentCourses {
        student_id: student.student_id,
        name: student.name,
        department: student.department,
        courses: courses.into_iter().map(Course::from).collect(),
    }))
}
