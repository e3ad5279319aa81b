use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/professors",
            get(handlers::professor::list_professors).post(handlers::professor::register_professor),
        )
        .route(
            "/api/professors/validate",
            post(handlers::professor::validate_professor_id),
        )
        .route(
            "/api/professors/by-email",
            get(handlers::professor::get_professor_by_email),
        )
        .route(
            "/api/professors/available",
            get(handlers::professor::list_available_professors),
        )
        .route(
            "/api/professors/:professor_id/courses",
            get(handlers::course::get_professor_courses),
        )
        .route(
            "/api/professors/:professor_id/available-times",
            post(handlers::professor::add_available_times),
        )
}
