use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", post(handlers::user::create_user))
        .route("/api/users/lookup", post(handlers::user::get_user_name))
        .route("/api/users/:github_id", get(handlers::user::get_user))
        .route("/api/user-courses", post(handlers::user::get_user_courses))
}
