use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/courses",
            get(handlers::course::list_courses)
                .post(handlers::course::save_courses)
                .delete(handlers::course::delete_courses),
        )
        .route("/api/courses/:code", get(handlers::course::get_course))
        .route(
            "/api/courses/:code/students",
            get(handlers::course::get_course_students),
        )
        .route(
            "/api/students",
            get(handlers::student::list_students).post(handlers::student::create_student),
        )
        .route("/api/students/enroll", post(handlers::student::enroll_students))
        .route(
            "/api/students/unenroll",
            post(handlers::student::unenroll_students),
        )
        .route(
            "/api/students/:student_id/courses",
            get(handlers::student::get_student_courses),
        )
}
