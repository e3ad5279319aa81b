use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/evaluations",
            post(handlers::evaluation::save_criteria).put(handlers::evaluation::update_criteria),
        )
        .route(
            "/api/evaluations/:course_code",
            get(handlers::evaluation::get_criteria),
        )
        .route(
            "/api/teams/register",
            post(handlers::evaluation::register_team_member),
        )
        .route("/api/teams/:course_code", get(handlers::evaluation::get_teams))
        .route(
            "/api/start-evaluation/:course_code",
            post(handlers::evaluation::start_evaluation),
        )
        .route(
            "/api/evaluation-assignments/:course_code/:student_id",
            get(handlers::evaluation::get_assignments),
        )
        .route("/api/evaluate", post(handlers::evaluation::submit_evaluation))
        .route(
            "/api/evaluation-results/:course_code",
            get(handlers::evaluation::get_results),
        )
        .route(
            "/api/evaluation-progress/:course_code",
            get(handlers::evaluation::get_progress),
        )
}
