use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::portfolio::list_projects).post(handlers::portfolio::save_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::portfolio::get_project)
                .put(handlers::portfolio::update_project)
                .delete(handlers::portfolio::delete_project),
        )
        .route(
            "/api/projects/:id/comments",
            post(handlers::portfolio::add_comment),
        )
        .route(
            "/api/summaries",
            get(handlers::portfolio::list_summaries).post(handlers::portfolio::save_summary),
        )
}
