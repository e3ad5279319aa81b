use axum::http::StatusCode;
use nest_api::routes::health::{HealthResponse, VersionResponse};
use nest_core::models::schedule::GeneratedSlots;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::test_server;

#[test_log::test(tokio::test)]
async fn test_health_check() {
    let server = test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<HealthResponse>(),
        HealthResponse {
            status: "ok".to_string()
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_version_reports_crate_version() {
    let server = test_server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<VersionResponse>().version,
        env!("CARGO_PKG_VERSION")
    );
}

#[test_log::test(tokio::test)]
async fn test_unknown_route_is_not_found() {
    let server = test_server();

    let response = server.get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_slot_generator() {
    let server = test_server();

    let response = server
        .get("/api/slots")
        .add_query_param("start", "09:00")
        .add_query_param("end", "10:30")
        .add_query_param("interval", 30)
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<GeneratedSlots>().slots,
        vec!["09:00", "09:30", "10:00"]
    );
}

#[test_log::test(tokio::test)]
async fn test_slot_generator_defaults_to_half_hours() {
    let server = test_server();

    let response = server
        .get("/api/slots")
        .add_query_param("start", "13:00")
        .add_query_param("end", "14:00")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<GeneratedSlots>().slots, vec!["13:00", "13:30"]);
}

#[test_log::test(tokio::test)]
async fn test_slot_generator_rejects_bad_input() {
    let server = test_server();

    let zero_interval = server
        .get("/api/slots")
        .add_query_param("start", "09:00")
        .add_query_param("end", "10:00")
        .add_query_param("interval", 0)
        .await;
    zero_interval.assert_status(StatusCode::BAD_REQUEST);

    let malformed = server
        .get("/api/slots")
        .add_query_param("start", "9am")
        .add_query_param("end", "10:00")
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert!(malformed.json::<serde_json::Value>()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid argument"));
}

#[test_log::test(tokio::test)]
async fn test_bookable_slots_need_a_day_or_date() {
    let server = test_server();

    let response = server.get("/api/professors/P-100/slots").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/professors/P-100/slots")
        .add_query_param("day", "Funday")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_reservation_date_must_match_day() {
    let server = test_server();

    // 2024-03-05 is a Tuesday
    let response = server
        .post("/api/reservations")
        .json(&json!({
            "student_name": "Kim Minji",
            "professor_id": "P-100",
            "day": "Monday",
            "date": "2024-03-05",
            "time": "10:00",
            "user_id": "gh-1",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_reservation_rejects_malformed_time() {
    let server = test_server();

    let response = server
        .post("/api/reservations")
        .json(&json!({
            "student_name": "Kim Minji",
            "professor_id": "P-100",
            "day": "Monday",
            "date": "2024-03-04",
            "time": "25:00",
            "user_id": "gh-1",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_save_courses_rejects_repeated_codes() {
    let server = test_server();
    let course = json!({
        "code": "CS101",
        "name": "Intro to Programming",
        "professor": "Lee",
        "professor_id": "P-100",
        "day": "Monday",
        "time": "10:00",
    });

    let response = server
        .post("/api/courses")
        .json(&json!([course.clone(), course]))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_save_courses_rejects_empty_batch() {
    let server = test_server();

    let response = server.post("/api/courses").json(&json!([])).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_evaluation_criteria_need_room_for_a_team() {
    let server = test_server();

    let response = server
        .post("/api/evaluations")
        .json(&json!({
            "course_code": "CS101",
            "criteria": ["design", "demo"],
            "max_teams": 0,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_question_requires_title() {
    let server = test_server();

    let response = server
        .post("/api/questions")
        .json(&json!({
            "title": "   ",
            "description": "Why does my borrow outlive the loop?",
            "category": "backend",
            "user_id": "gh-1",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_code_answer_rejects_negative_line() {
    let server = test_server();

    let response = server
        .post("/api/questions/4f8c2a5e-8d0b-4c41-9a43-1d2f7e6b9c10/answers")
        .json(&json!({
            "line_number": -1,
            "text": "Clone the string before the loop.",
            "user_id": "gh-2",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_malformed_question_id_is_rejected() {
    let server = test_server();

    let response = server.get("/api/questions/not-a-uuid").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_empty_comment_is_rejected() {
    let server = test_server();

    let response = server
        .post("/api/projects/4f8c2a5e-8d0b-4c41-9a43-1d2f7e6b9c10/comments")
        .json(&json!({ "username": "octocat", "content": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_negative_answer_index_gets_json_error() {
    let server = test_server();

    let response = server
        .post("/api/questions/4f8c2a5e-8d0b-4c41-9a43-1d2f7e6b9c10/general-answers/-1/resolve")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert!(body["error"].as_str().unwrap().starts_with("Validation error:"));
}

#[test_log::test(tokio::test)]
async fn test_malformed_json_gets_json_error() {
    let server = test_server();

    let response = server
        .post("/api/questions")
        .text("{\"title\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<serde_json::Value>()["error"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_bad_query_gets_json_error() {
    let server = test_server();

    let response = server
        .get("/api/slots")
        .add_query_param("start", "09:00")
        .add_query_param("end", "10:00")
        .add_query_param("interval", "soon")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<serde_json::Value>()["error"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_problem_requires_title() {
    let server = test_server();

    let response = server
        .post("/api/problems")
        .json(&json!({
            "title": "  ",
            "description": "Print the sum of two integers.",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_malformed_problem_id_is_rejected() {
    let server = test_server();

    let response = server.get("/api/problems/42").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
