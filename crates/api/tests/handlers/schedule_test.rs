use std::collections::HashMap;

use axum::Json;
use chrono::Utc;
use mockall::predicate::eq;
use nest_api::handlers::schedule::{check_reservation_day, resolve_day};
use nest_api::middleware::error_handling::AppError;
use nest_core::{
    errors::NestError,
    models::schedule::{BookableSlotsQuery, CreateReservationRequest, CreateReservationResponse},
    slots::{bookable_slots, check_bookable, normalize_time, DaySchedule, UnavailableTime, WeeklySchedule},
};
use nest_db::{
    models::{DbAvailability, DbReservation, DbSlotCount},
    UNKNOWN_NAME,
};
use pretty_assertions::assert_eq;
use sqlx::types::Json as DbJson;
use uuid::Uuid;

use crate::test_utils::TestContext;

// Booking flow of the reservation handler with the repositories mocked out.
async fn test_create_reservation_wrapper(
    ctx: &mut TestContext,
    request: CreateReservationRequest,
) -> Result<Json<CreateReservationResponse>, AppError> {
    let time = normalize_time(&request.time)?;
    check_reservation_day(&request.day, &request.date)?;

    let professor_name = ctx
        .course_repo
        .get_professor_name(request.professor_id.clone())
        .await?
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let availability = ctx
        .availability_repo
        .get_availability_by_professor(request.professor_id.clone())
        .await?
        .ok_or_else(|| NestError::NotFound("No availability settings found.".to_string()))?;

    let booked = ctx
        .reservation_repo
        .count_reservations_at(request.professor_id.clone(), request.day.clone(), time.clone())
        .await?;

    check_bookable(
        &availability.weekly_schedule,
        &request.day,
        &time,
        &availability.unavailable_times,
        booked,
    )?;

    let reservation = ctx
        .reservation_repo
        .insert_reservation(
            request.student_name,
            request.professor_id,
            professor_name,
            request.day,
            request.date,
            time,
            request.user_id,
        )
        .await?;

    Ok(Json(CreateReservationResponse {
        message: "Reservation saved successfully!".to_string(),
        id: reservation.id,
    }))
}

fn availability(max_capacity: u32, unavailable: Vec<UnavailableTime>) -> DbAvailability {
    let mut weekly = WeeklySchedule::new();
    weekly.insert(
        "Monday".to_string(),
        DaySchedule {
            start: Some("10:00".to_string()),
            end: Some("12:00".to_string()),
            interval: 30,
            max_capacity,
        },
    );

    DbAvailability {
        professor_id: "P-100".to_string(),
        email: "lee@nest.example.edu".to_string(),
        weekly_schedule: DbJson(weekly),
        unavailable_times: DbJson(unavailable),
        updated_at: Utc::now(),
    }
}

fn monday_request(time: &str) -> CreateReservationRequest {
    CreateReservationRequest {
        student_name: "Kim Minji".to_string(),
        professor_id: "P-100".to_string(),
        day: "Monday".to_string(),
        // A Monday
        date: "2024-03-04".to_string(),
        time: time.to_string(),
        user_id: "gh-1".to_string(),
    }
}

fn expect_availability(ctx: &mut TestContext, availability: DbAvailability) {
    ctx.course_repo
        .expect_get_professor_name()
        .with(eq("P-100".to_string()))
        .returning(|_| Ok(Some("Lee".to_string())));
    ctx.availability_repo
        .expect_get_availability_by_professor()
        .with(eq("P-100".to_string()))
        .return_once(move |_| Ok(Some(availability)));
}

#[tokio::test]
async fn test_reservation_is_booked() {
    let mut ctx = TestContext::new();
    expect_availability(&mut ctx, availability(2, Vec::new()));

    ctx.reservation_repo
        .expect_count_reservations_at()
        .with(
            eq("P-100".to_string()),
            eq("Monday".to_string()),
            eq("10:30".to_string()),
        )
        .returning(|_, _, _| Ok(1));

    let id = Uuid::new_v4();
    ctx.reservation_repo
        .expect_insert_reservation()
        .times(1)
        .returning(move |student_name, professor_id, professor_name, day, date, time, user_id| {
            assert_eq!(professor_name, "Lee");
            assert_eq!(time, "10:30");
            Ok(DbReservation {
                id,
                student_name,
                professor_id,
                professor_name,
                day,
                date,
                time,
                user_id,
                created_at: Utc::now(),
            })
        });

    let response = test_create_reservation_wrapper(&mut ctx, monday_request("10:30"))
        .await
        .unwrap();

    assert_eq!(response.0.id, id);
}

#[tokio::test]
async fn test_full_slot_is_rejected() {
    let mut ctx = TestContext::new();
    expect_availability(&mut ctx, availability(1, Vec::new()));

    ctx.reservation_repo
        .expect_count_reservations_at()
        .returning(|_, _, _| Ok(1));
    ctx.reservation_repo.expect_insert_reservation().never();

    let result = test_create_reservation_wrapper(&mut ctx, monday_request("11:00")).await;

    match result.unwrap_err().0 {
        NestError::Conflict(message) => assert_eq!(message, "The selected time is fully booked."),
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_blocked_slot_is_rejected() {
    let mut ctx = TestContext::new();
    let blocked = vec![UnavailableTime {
        day: "Monday".to_string(),
        time: "10:00".to_string(),
    }];
    expect_availability(&mut ctx, availability(3, blocked));

    ctx.reservation_repo
        .expect_count_reservations_at()
        .returning(|_, _, _| Ok(0));
    ctx.reservation_repo.expect_insert_reservation().never();

    let result = test_create_reservation_wrapper(&mut ctx, monday_request("10:00")).await;

    match result.unwrap_err().0 {
        NestError::Validation(message) => assert_eq!(message, "The selected time is unavailable."),
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_time_outside_office_hours_is_rejected() {
    let mut ctx = TestContext::new();
    expect_availability(&mut ctx, availability(3, Vec::new()));

    ctx.reservation_repo
        .expect_count_reservations_at()
        .returning(|_, _, _| Ok(0));
    ctx.reservation_repo.expect_insert_reservation().never();

    let result = test_create_reservation_wrapper(&mut ctx, monday_request("10:15")).await;

    match result.unwrap_err().0 {
        NestError::Validation(message) => assert_eq!(message, "Invalid reservation time."),
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_professor_without_availability_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.course_repo
        .expect_get_professor_name()
        .returning(|_| Ok(None));
    ctx.availability_repo
        .expect_get_availability_by_professor()
        .returning(|_| Ok(None));

    let result = test_create_reservation_wrapper(&mut ctx, monday_request("10:00")).await;

    assert!(matches!(result.unwrap_err().0, NestError::NotFound(_)));
}

#[tokio::test]
async fn test_bookable_slots_from_counts() {
    let mut ctx = TestContext::new();
    ctx.reservation_repo
        .expect_count_reservations_by_time()
        .with(eq("P-100".to_string()), eq("Monday".to_string()))
        .returning(|_, _| {
            Ok(vec![
                DbSlotCount {
                    time: "10:00".to_string(),
                    count: 2,
                },
                DbSlotCount {
                    time: "11:00".to_string(),
                    count: 1,
                },
            ])
        });

    let day = resolve_day(&BookableSlotsQuery {
        day: None,
        date: Some("2024-03-04".to_string()),
    })
    .unwrap();
    let booked: HashMap<String, i64> = ctx
        .reservation_repo
        .count_reservations_by_time("P-100".to_string(), day.clone())
        .await
        .unwrap()
        .into_iter()
        .map(|slot| (slot.time, slot.count))
        .collect();

    let stored = availability(2, Vec::new());
    let slots = bookable_slots(&stored.weekly_schedule, &day, &stored.unavailable_times, &booked).unwrap();

    assert_eq!(slots, vec!["10:30", "11:00", "11:30"]);
}

#[test]
fn test_resolve_day_prefers_date() {
    let query = BookableSlotsQuery {
        day: Some("Friday".to_string()),
        date: Some("2024-03-05".to_string()),
    };

    assert_eq!(resolve_day(&query).unwrap(), "Tuesday");
}

#[test]
fn test_check_reservation_day() {
    assert!(check_reservation_day("Monday", "2024-03-04").is_ok());
    assert!(matches!(
        check_reservation_day("Sunday", "2024-03-04"),
        Err(NestError::Validation(_))
    ));
    assert!(matches!(
        check_reservation_day("Monday", "03/04/2024"),
        Err(NestError::InvalidArgument(_))
    ));
}
