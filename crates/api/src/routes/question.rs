use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/questions",
            get(handlers::question::list_questions).post(handlers::question::create_question),
        )
        .route("/api/questions/:id", get(handlers::question::get_question))
        .route(
            "/api/questions/:id/answers",
            post(handlers::question::add_code_answer),
        )
        .route(
            "/api/questions/:id/general-answers",
            post(handlers::question::add_general_answer),
        )
        .route(
            "/api/questions/:id/general-answers/:index/resolve",
            post(handlers::question::resolve_general_answer),
        )
        .route(
            "/api/questions/:id/answers/:line_number/:index/resolve",
            post(handlers::question::resolve_code_answer),
        )
        .route(
            "/api/scores/:student_id",
            get(handlers::question::get_student_scores),
        )
}
