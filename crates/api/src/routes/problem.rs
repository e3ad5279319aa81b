use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Practice problems of the code-test pages. Submissions are judged elsewhere.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/problems",
            get(handlers::problem::list_problems).post(handlers::problem::create_problem),
        )
        .route("/api/problems/:id", get(handlers::problem::get_problem))
}
