use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::{
        evaluation::{
            CourseTeams, EvaluationAssignments, EvaluationCriteria, EvaluationSubmission,
            StartEvaluationResponse, TeamMember, TeamProgress, TeamRegistrationRequest, TeamResult,
        },
        MessageResponse,
    },
    teams::{assign_peer_reviews, register_member, tally_by_team, validate_scores},
};
use nest_db::repositories::{evaluation as evaluation_repo, user as user_repo};
use nest_db::DbPool;
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::{conflict_on_duplicate, AppError},
    ApiState,
};

fn criteria_not_found() -> NestError {
    NestError::NotFound("Evaluation criteria not found".to_string())
}

fn validate_criteria(payload: &EvaluationCriteria) -> Result<(), NestError> {
    if payload.criteria.iter().any(|criterion| criterion.trim().is_empty()) {
        return Err(NestError::Validation(
            "Evaluation criteria must not be blank".to_string(),
        ));
    }
    if payload.max_teams == 0 {
        return Err(NestError::Validation(
            "A course needs room for at least one team".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn save_criteria(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<EvaluationCriteria>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_criteria(&payload)?;

    if evaluation_repo::get_criteria(&state.db_pool, &payload.course_code)
        .await?
        .is_some()
    {
        return Err(AppError(NestError::Conflict(
            "Evaluation criteria already exists. Do you want to update it?".to_string(),
        )));
    }

    evaluation_repo::create_criteria(
        &state.db_pool,
        &payload.course_code,
        &payload.criteria,
        payload.max_teams,
    )
    .await
    .map_err(conflict_on_duplicate(
        "Evaluation criteria already exists. Do you want to update it?",
    ))?;
    info!("Saved evaluation criteria for {}", payload.course_code);

    Ok(Json(MessageResponse::new(
        "Evaluation criteria saved successfully",
    )))
}

#[axum::debug_handler]
pub async fn update_criteria(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<EvaluationCriteria>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_criteria(&payload)?;

    evaluation_repo::update_criteria(
        &state.db_pool,
        &payload.course_code,
        &payload.criteria,
        payload.max_teams,
    )
    .await?
    .ok_or_else(criteria_not_found)?;

    Ok(Json(MessageResponse::new(
        "Evaluation criteria updated successfully",
    )))
}

#[axum::debug_handler]
pub async fn get_criteria(
    State(state): State<Arc<ApiState>>,
    AppPath(course_code): AppPath<String>,
) -> Result<Json<EvaluationCriteria>, AppError> {
    let criteria = evaluation_repo::get_criteria(&state.db_pool, &course_code)
        .await?
        .ok_or_else(criteria_not_found)?;

    Ok(Json(criteria.into()))
}

/// Joins the student behind `github_id` to a team of the course.
///
/// The criteria row is locked while the teams are rewritten, so concurrent
/// registrations cannot push a course past its team limit.
#[axum::debug_handler]
pub async fn register_team_member(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<TeamRegistrationRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = user_repo::get_user_by_github_id(&state.db_pool, &payload.github_id)
        .await?
        .ok_or_else(|| NestError::NotFound("Student not found".to_string()))?;

    let mut tx = state.db_pool.begin().await.map_err(eyre::Report::from)?;

    let criteria = evaluation_repo::get_criteria_for_update(&mut *tx, &payload.course_code)
        .await?
        .ok_or_else(criteria_not_found)?;
    let criteria = EvaluationCriteria::from(criteria);

    let mut teams = evaluation_repo::get_teams(&mut *tx, &payload.course_code).await?;
    register_member(
        &mut teams,
        criteria.max_teams,
        TeamMember {
            student_id: user.student_id.clone(),
            name: user.name,
        },
        &payload.team_name,
    )?;

    evaluation_repo::replace_teams(&mut *tx, &payload.course_code, &teams).await?;
    tx.commit().await.map_err(eyre::Report::from)?;

    info!(
        "Student {} joined team '{}' in {}",
        user.student_id,
        payload.team_name.trim(),
        payload.course_code
    );

    Ok(Json(MessageResponse::new("Student registered successfully")))
}

#[axum::debug_handler]
pub async fn get_teams(
    State(state): State<Arc<ApiState>>,
    AppPath(course_code): AppPath<String>,
) -> Result<Json<CourseTeams>, AppError> {
    let teams = evaluation_repo::get_teams(&state.db_pool, &course_code).await?;

    Ok(Json(CourseTeams { course_code, teams }))
}

#[axum::debug_handler]
pub async fn start_evaluation(
    State(state): State<Arc<ApiState>>,
    AppPath(course_code): AppPath<String>,
) -> Result<Json<StartEvaluationResponse>, AppError> {
    let teams = evaluation_repo::get_teams(&state.db_pool, &course_code).await?;
    if teams.is_empty() {
        return Err(AppError(NestError::NotFound(
            "No teams found for the course".to_string(),
        )));
    }

    let assignments = assign_peer_reviews(&teams, &mut rand::thread_rng());
    evaluation_repo::replace_assignments(&state.db_pool, &course_code, &assignments).await?;

    info!(
        "Started peer evaluation for {}: {} students assigned",
        course_code,
        assignments.len()
    );

    Ok(Json(StartEvaluationResponse {
        message: "Evaluation started successfully".to_string(),
        assigned_students: assignments.len(),
    }))
}

#[axum::debug_handler]
pub async fn get_assignments(
    State(state): State<Arc<ApiState>>,
    AppPath((course_code, student_id)): AppPath<(String, String)>,
) -> Result<Json<EvaluationAssignments>, AppError> {
    let evaluations = evaluation_repo::get_assignments(&state.db_pool, &course_code, &student_id)
        .await?
        .filter(|evaluations| !evaluations.is_empty())
        .ok_or_else(|| NestError::NotFound("Evaluations not found for the student".to_string()))?;

    Ok(Json(EvaluationAssignments { evaluations }))
}

#[axum::debug_handler]
pub async fn submit_evaluation(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<EvaluationSubmission>,
) -> Result<Json<MessageResponse>, AppError> {
    let criteria = evaluation_repo::get_criteria(&state.db_pool, &payload.course_code)
        .await?
        .ok_or_else(criteria_not_found)?;
    validate_scores(&criteria.criteria, &payload.scores)?;

    if !evaluation_repo::insert_evaluation(&state.db_pool, &payload).await? {
        return Err(AppError(NestError::Conflict(
            "You have already submitted an evaluation for this team.".to_string(),
        )));
    }

    Ok(Json(MessageResponse::new("Evaluation submitted successfully")))
}

async fn course_progress(pool: &DbPool, course_code: &str) -> Result<Vec<TeamProgress>, AppError> {
    let results = evaluation_repo::list_evaluation_results(pool, course_code).await?;

    Ok(tally_by_team(
        results
            .into_iter()
            .map(|result| (result.team_name, result.scores.0)),
    ))
}

#[axum::debug_handler]
pub async fn get_results(
    State(state): State<Arc<ApiState>>,
    AppPath(course_code): AppPath<String>,
) -> Result<Json<Vec<TeamResult>>, AppError> {
    let progress = course_progress(&state.db_pool, &course_code).await?;

    Ok(Json(progress.into_iter().map(TeamResult::from).collect()))
}

#[axum::debug_handler]
pub async fn get_progress(
    State(state): State<Arc<ApiState>>,
    AppPath(course_code): AppPath<String>,
) -> Result<Json<Vec<TeamProgress>>, AppError> {
    Ok(Json(course_progress(&state.db_pool, &course_code).await?))
}
