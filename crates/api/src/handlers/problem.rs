use axum::{extract::State, http::StatusCode, Json};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::problem::{CreateProblemRequest, CreateProblemResponse, Problem},
};
use nest_db::repositories::problem as problem_repo;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::AppError,
    ApiState,
};

#[axum::debug_handler]
pub async fn create_problem(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateProblemRequest>,
) -> Result<(StatusCode, Json<CreateProblemResponse>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Problem title is required".to_string(),
        )));
    }

    let problem = problem_repo::create_problem(&state.db_pool, &payload).await?;
    info!("Created problem {} ({})", problem.id, problem.title);

    Ok((
        StatusCode::CREATED,
        Json(CreateProblemResponse { id: problem.id }),
    ))
}

#[axum::debug_handler]
pub async fn list_problems(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Problem>>, AppError> {
    let problems = problem_repo::list_problems(&state.db_pool).await?;

    Ok(Json(problems.into_iter().map(Problem::from).collect()))
}

#[axum::debug_handler]
pub async fn get_problem(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Problem>, AppError> {
    let problem = problem_repo::get_problem(&state.db_pool, id)
        .await?
        .ok_or_else(|| NestError::NotFound("Problem not found".to_string()))?;

    Ok(Json(problem.into()))
}
