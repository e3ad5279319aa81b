use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::{
        project::{Comment, CreateCommentRequest, Project, ProjectInfo, SaveProjectResponse},
        summary::{CreateSummaryRequest, Summary},
        MessageResponse,
    },
};
use nest_db::models::DbComment;
use nest_db::repositories::{project as project_repo, summary as summary_repo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::AppError,
    ApiState,
};

fn project_not_found(id: Uuid) -> NestError {
    NestError::NotFound(format!("Project {} not found", id))
}

#[axum::debug_handler]
pub async fn save_project(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<ProjectInfo>,
) -> Result<Json<SaveProjectResponse>, AppError> {
    let project = project_repo::create_project(&state.db_pool, &payload).await?;
    info!("Saved project {} for {}", project.id, project.username);

    Ok(Json(SaveProjectResponse {
        status: "success".to_string(),
        document_id: project.id,
    }))
}

#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = project_repo::list_projects(&state.db_pool).await?;
    let ids: Vec<Uuid> = projects.iter().map(|project| project.id).collect();

    let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in project_repo::get_comments(&state.db_pool, &ids).await? {
        comments
            .entry(comment.project_id)
            .or_default()
            .push(comment.into());
    }

    Ok(Json(
        projects
            .into_iter()
            .map(|project| {
                let comments = comments.remove(&project.id).unwrap_or_default();
                project.into_project(comments)
            })
            .collect(),
    ))
}

/// Returns a project and counts the view.
#[axum::debug_handler]
pub async fn get_project(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = project_repo::view_project(&state.db_pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    let comments = project_repo::get_comments(&state.db_pool, &[id])
        .await?
        .into_iter()
        .map(Comment::from)
        .collect();

    Ok(Json(project.into_project(comments)))
}

#[axum::debug_handler]
pub async fn update_project(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ProjectInfo>,
) -> Result<Json<MessageResponse>, AppError> {
    project_repo::update_project(&state.db_pool, id, &payload)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(Json(MessageResponse::new("Project updated successfully")))
}

#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !project_repo::delete_project(&state.db_pool, id).await? {
        return Err(AppError(project_not_found(id)));
    }
    info!("Deleted project {}", id);

    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

#[axum::debug_handler]
pub async fn add_comment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Comment must not be empty".to_string(),
        )));
    }

    let comment: DbComment = project_repo::add_comment(&state.db_pool, id, &payload.username, &payload.content)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(Json(comment.into()))
}

#[axum::debug_handler]
pub async fn save_summary(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateSummaryRequest>,
) -> Result<Json<Summary>, AppError> {
    if payload.final_summary.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Summary text is required".to_string(),
        )));
    }

    let summary = summary_repo::create_summary(&state.db_pool, &payload.final_summary, &payload.image_data).await?;

    Ok(Json(summary.into()))
}

#[axum::debug_handler]
pub async fn list_summaries(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Summary>>, AppError> {
    let summaries = summary_repo::list_summaries(&state.db_pool).await?;

    Ok(Json(summaries.into_iter().map(Summary::from).collect()))
}
