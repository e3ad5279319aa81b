//! End-to-end tests against a real database. They need `DATABASE_URL` and run
//! with `cargo test -- --ignored`.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use nest_api::{build_router, ApiState};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::test_utils::test_config;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn live_server(max_connections: u32) -> TestServer {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL points at a test database");
    let pool = nest_db::create_pool(&url, max_connections)
        .await
        .expect("database is reachable");
    SCHEMA
        .get_or_init(|| async {
            nest_db::schema::initialize_database(&pool)
                .await
                .expect("schema applies");
        })
        .await;

    let app = build_router(Arc::new(ApiState { db_pool: pool }), &test_config())
        .expect("router builds");
    TestServer::new(app).expect("test server starts")
}

fn new_user() -> Value {
    let id = Uuid::new_v4().simple().to_string();
    json!({
        "name": "Test Student",
        "schoolEmail": format!("{}@nest.example.edu", &id[..12]),
        "studentId": id,
        "age": 22,
        "contact": "010-0000-0000",
        "githubUsername": format!("gh-{}", &id[..12]),
        "githubName": "Test Student",
        "githubId": format!("gh-{}", id),
    })
}

#[tokio::test]
#[ignore = "needs a Postgres database in DATABASE_URL"]
async fn test_concurrent_resolution_toggles_share_a_small_pool() {
    let server = live_server(2).await;

    let asker = new_user();
    let answerer = new_user();
    server.post("/api/users").json(&asker).await.assert_status(StatusCode::CREATED);
    server.post("/api/users").json(&answerer).await.assert_status(StatusCode::CREATED);

    let question = server
        .post("/api/questions")
        .json(&json!({
            "title": "Why does my borrow outlive the loop?",
            "description": "Lifetime error on a Vec push.",
            "category": "backend",
            "user_id": asker["githubId"],
        }))
        .await
        .json::<Value>();
    let question_id = question["id"].as_str().unwrap().to_string();

    server
        .post(&format!("/api/questions/{}/general-answers", question_id))
        .json(&json!({ "text": "Clone before pushing.", "user_id": answerer["githubId"] }))
        .await
        .assert_status_ok();

    let path = format!("/api/questions/{}/general-answers/0/resolve", question_id);
    let toggles = async {
        tokio::join!(
            server.post(&path).into_future(),
            server.post(&path).into_future(),
            server.post(&path).into_future(),
            server.post(&path).into_future(),
        )
    };
    let (a, b, c, d) = tokio::time::timeout(Duration::from_secs(10), toggles)
        .await
        .expect("toggles finish without exhausting the pool");

    for response in [a, b, c, d] {
        response.assert_status_ok();
    }

    // An even number of toggles leaves the answer unresolved.
    let question = server
        .get(&format!("/api/questions/{}", question_id))
        .await
        .json::<Value>();
    assert_eq!(question["general_answers"][0]["resolved"], false);
}

#[tokio::test]
#[ignore = "needs a Postgres database in DATABASE_URL"]
async fn test_concurrent_duplicate_users_conflict() {
    let server = live_server(4).await;
    let user = new_user();

    let (a, b, c, d, e, f) = tokio::join!(
        server.post("/api/users").json(&user).into_future(),
        server.post("/api/users").json(&user).into_future(),
        server.post("/api/users").json(&user).into_future(),
        server.post("/api/users").json(&user).into_future(),
        server.post("/api/users").json(&user).into_future(),
        server.post("/api/users").json(&user).into_future(),
    );

    let statuses: Vec<StatusCode> = [a, b, c, d, e, f]
        .iter()
        .map(|response| response.status_code())
        .collect();

    assert_eq!(
        statuses.iter().filter(|status| **status == StatusCode::CREATED).count(),
        1
    );
    assert!(statuses
        .iter()
        .all(|status| *status == StatusCode::CREATED || *status == StatusCode::CONFLICT));
}

#[tokio::test]
#[ignore = "needs a Postgres database in DATABASE_URL"]
async fn test_problem_bank_round_trip() {
    let server = live_server(2).await;

    let created = server
        .post("/api/problems")
        .json(&json!({
            "title": "A + B",
            "description": "Print the sum of two integers.",
            "input_description": "Two integers on one line.",
            "output_description": "Their sum.",
            "sample_input": "1 2",
            "sample_output": "3",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let problem = server.get(&format!("/api/problems/{}", id)).await.json::<Value>();
    assert_eq!(problem["sample_output"], "3");

    server
        .get(&format!("/api/problems/{}", Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "needs a Postgres database in DATABASE_URL"]
async fn test_professor_list_keeps_available_times_apart() {
    let server = live_server(2).await;
    let suffix = &Uuid::new_v4().simple().to_string()[..10];
    let (first, second) = (format!("P1-{}", suffix), format!("P2-{}", suffix));

    let courses: Vec<Value> = [&first, &second]
        .iter()
        .enumerate()
        .map(|(i, professor_id)| {
            json!({
                "code": format!("C{}-{}", i, suffix),
                "name": "Systems Programming",
                "professor": "Lee",
                "professor_id": professor_id,
                "day": "Monday",
                "time": "10:00",
            })
        })
        .collect();
    server.post("/api/courses").json(&courses).await.assert_status_ok();

    for (professor_id, date) in [(&first, "2026-03-02"), (&second, "2026-03-03")] {
        server
            .post("/api/professors")
            .json(&json!({
                "email": format!("{}@nest.example.edu", professor_id),
                "professor_id": professor_id,
                "name": "Lee",
            }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(&format!("/api/professors/{}/available-times", professor_id))
            .json(&json!({ "date": date, "times": ["10:00", "10:30"] }))
            .await
            .assert_status_ok();
    }

    let professors = server.get("/api/professors").await.json::<Vec<Value>>();
    let dates_of = |professor_id: &str| -> Vec<Value> {
        professors
            .iter()
            .find(|professor| professor["professor_id"] == professor_id)
            .map(|professor| {
                professor["available_times"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|entry| entry["date"].clone())
                    .collect()
            })
            .unwrap()
    };

    assert_eq!(dates_of(&first), vec![json!("2026-03-02")]);
    assert_eq!(dates_of(&second), vec![json!("2026-03-03")]);
}
