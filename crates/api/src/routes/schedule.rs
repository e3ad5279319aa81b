use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            get(handlers::schedule::get_availability).post(handlers::schedule::save_availability),
        )
        .route("/api/slots", get(handlers::schedule::generate_slot_list))
        .route(
            "/api/professors/:professor_id/slots",
            get(handlers::schedule::get_bookable_slots),
        )
        .route(
            "/api/professors/:professor_id/reservations",
            get(handlers::schedule::get_professor_reservations),
        )
        .route(
            "/api/reservations",
            get(handlers::schedule::list_reservations).post(handlers::schedule::create_reservation),
        )
        .route(
            "/api/reservations/professor",
            get(handlers::schedule::get_professor_reservations_by_email),
        )
}
