use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::{
        professor::{
            AvailableProfessor, AvailableTimes, EmailQuery, Professor, RegisterProfessorRequest,
            RegisterProfessorResponse, ValidateProfessorRequest,
        },
        MessageResponse,
    },
    slots::{normalize_time, weekday_name},
};
use nest_db::{
    models::DbProfessor,
    repositories::{course as course_repo, professor as professor_repo},
    DbPool,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    extract::{AppJson, AppPath, AppQuery},
    middleware::error_handling::{conflict_on_duplicate, AppError},
    ApiState,
};

async fn ensure_teaches_a_course(pool: &DbPool, professor_id: &str) -> Result<(), AppError> {
    if course_repo::get_professor_name(pool, professor_id).await?.is_none() {
        warn!("Professor {} does not exist in any course", professor_id);
        return Err(AppError(NestError::Validation(
            "Professor with this ID does not exist in any course.".to_string(),
        )));
    }
    Ok(())
}

/// Attaches available times to professors with one query for all of them.
async fn with_available_times(
    pool: &DbPool,
    professors: Vec<DbProfessor>,
) -> Result<Vec<Professor>, AppError> {
    let ids: Vec<String> = professors
        .iter()
        .map(|professor| professor.professor_id.clone())
        .collect();

    let mut times: HashMap<String, Vec<AvailableTimes>> = HashMap::new();
    for entry in professor_repo::get_available_times(pool, &ids).await? {
        times
            .entry(entry.professor_id.clone())
            .or_default()
            .push(entry.into());
    }

    Ok(professors
        .into_iter()
        .map(|professor| Professor {
            available_times: times.remove(&professor.professor_id).unwrap_or_default(),
            professor_id: professor.professor_id,
            email: professor.email,
            name: professor.name,
            created_at: professor.created_at,
        })
        .collect())
}

#[axum::debug_handler]
pub async fn register_professor(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<RegisterProfessorRequest>,
) -> Result<(StatusCode, Json<RegisterProfessorResponse>), AppError> {
    ensure_teaches_a_course(&state.db_pool, &payload.professor_id).await?;

    if professor_repo::get_professor_by_email(&state.db_pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError(NestError::Conflict(
            "Professor with this email already exists.".to_string(),
        )));
    }

    if professor_repo::get_professor_by_id(&state.db_pool, &payload.professor_id)
        .await?
        .is_some()
    {
        return Err(AppError(NestError::Conflict(
            "Professor with this ID is already registered.".to_string(),
        )));
    }

    let professor = professor_repo::create_professor(
        &state.db_pool,
        &payload.professor_id,
        &payload.email,
        payload.name.as_deref(),
    )
    .await
    .map_err(conflict_on_duplicate(
        "Professor with this email or ID is already registered.",
    ))?;
    info!("Registered professor {}", professor.professor_id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterProfessorResponse {
            message: "Professor registered successfully".to_string(),
            professor_id: professor.professor_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn validate_professor_id(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<ValidateProfessorRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_teaches_a_course(&state.db_pool, &payload.professor_id).await?;

    Ok(Json(MessageResponse::new("Professor ID is valid.")))
}

#[axum::debug_handler]
pub async fn get_professor_by_email(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<EmailQuery>,
) -> Result<Json<Professor>, AppError> {
    let professor = professor_repo::get_professor_by_email(&state.db_pool, &query.email)
        .await?
        .ok_or_else(|| NestError::NotFound("Professor not found".to_string()))?;

    let professor = with_available_times(&state.db_pool, vec![professor])
        .await?
        .pop()
        .ok_or_else(|| NestError::NotFound("Professor not found".to_string()))?;

    Ok(Json(professor))
}

#[axum::debug_handler]
pub async fn list_professors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Professor>>, AppError> {
    let professors = professor_repo::list_professors(&state.db_pool).await?;

    Ok(Json(with_available_times(&state.db_pool, professors).await?))
}

/// Professors that published office hours, for the booking page.
#[axum::debug_handler]
pub async fn list_available_professors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AvailableProfessor>>, AppError> {
    let professors = professor_repo::list_available_professors(&state.db_pool).await?;

    Ok(Json(professors.into_iter().map(AvailableProfessor::from).collect()))
}

#[axum::debug_handler]
pub async fn add_available_times(
    State(state): State<Arc<ApiState>>,
    AppPath(professor_id): AppPath<String>,
    AppJson(payload): AppJson<AvailableTimes>,
) -> Result<Json<AvailableTimes>, AppError> {
    weekday_name(&payload.date)?;
    let times = payload
        .times
        .iter()
        .map(|time| normalize_time(time))
        .collect::<Result<Vec<_>, _>>()?;

    if professor_repo::get_professor_by_id(&state.db_pool, &professor_id)
        .await?
        .is_none()
    {
        return Err(AppError(NestError::NotFound("Professor not found".to_string())));
    }

    let entry = professor_repo::add_available_times(&state.db_pool, &professor_id, &payload.date, &times).await?;

    Ok(Json(entry.into()))
}
