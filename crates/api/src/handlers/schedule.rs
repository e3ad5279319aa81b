use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::{NestError, NestResult},
    models::{
        professor::EmailQuery,
        schedule::{
            Availability, AvailabilityData, AvailabilityQuery, BookableSlots, BookableSlotsQuery,
            CreateReservationRequest, CreateReservationResponse, GeneratedSlots, Reservation,
            ReservationFilter, SlotQuery,
        },
        MessageResponse,
    },
    slots::{
        bookable_slots, check_bookable, generate_slots, normalize_time,
        validate_unavailable_times, validate_weekly_schedule, weekday_name, UnavailableTime,
        DAYS_OF_WEEK,
    },
};
use nest_db::repositories::{
    availability as availability_repo, course as course_repo, professor as professor_repo,
    reservation as reservation_repo,
};
use nest_db::UNKNOWN_NAME;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::{AppJson, AppPath, AppQuery},
    middleware::error_handling::AppError,
    ApiState,
};

/// Slot length used by the generator when the query names none.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

/// Day name a bookable-slots query refers to. A date wins over a day name.
pub fn resolve_day(query: &BookableSlotsQuery) -> NestResult<String> {
    match (&query.date, &query.day) {
        (Some(date), _) => Ok(weekday_name(date)?.to_string()),
        (None, Some(day)) if DAYS_OF_WEEK.contains(&day.as_str()) => Ok(day.clone()),
        (None, Some(day)) => Err(NestError::Validation(format!("Unknown day of week '{}'", day))),
        (None, None) => Err(NestError::Validation(
            "Either a day or a date is required".to_string(),
        )),
    }
}

/// Rejects a reservation whose date does not fall on its day.
pub fn check_reservation_day(day: &str, date: &str) -> NestResult<()> {
    let actual = weekday_name(date)?;
    if actual != day {
        return Err(NestError::Validation(format!(
            "Reservation date {} is a {}, not a {}",
            date, actual, day
        )));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn save_availability(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<AvailabilityData>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_weekly_schedule(&payload.weekly_schedule)?;
    validate_unavailable_times(&payload.unavailable_times)?;

    let unavailable_times = payload
        .unavailable_times
        .iter()
        .map(|slot| {
            Ok(UnavailableTime {
                day: slot.day.clone(),
                time: normalize_time(&slot.time)?,
            })
        })
        .collect::<NestResult<Vec<_>>>()?;

    let professor = professor_repo::get_professor_by_email(&state.db_pool, &payload.email)
        .await?
        .ok_or_else(|| NestError::NotFound("Professor not found".to_string()))?;

    if course_repo::get_professor_name(&state.db_pool, &professor.professor_id)
        .await?
        .is_none()
    {
        return Err(AppError(NestError::NotFound("Course not found".to_string())));
    }

    availability_repo::upsert_availability(
        &state.db_pool,
        &professor.professor_id,
        &payload.email,
        &payload.weekly_schedule,
        &unavailable_times,
    )
    .await?;
    info!("Saved availability for professor {}", professor.professor_id);

    Ok(Json(MessageResponse::new(
        "Availability settings saved successfully!",
    )))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Availability>, AppError> {
    let availability = match (&query.professor_id, &query.email) {
        (Some(professor_id), _) => {
            availability_repo::get_availability_by_professor(&state.db_pool, professor_id).await?
        }
        (None, Some(email)) => availability_repo::get_availability_by_email(&state.db_pool, email).await?,
        (None, None) => {
            return Err(AppError(NestError::Validation(
                "Either professor_id or email is required".to_string(),
            )));
        }
    };

    let availability = availability
        .ok_or_else(|| NestError::NotFound("No availability settings found.".to_string()))?;

    Ok(Json(availability.into()))
}

#[axum::debug_handler]
pub async fn get_bookable_slots(
    State(state): State<Arc<ApiState>>,
    AppPath(professor_id): AppPath<String>,
    AppQuery(query): AppQuery<BookableSlotsQuery>,
) -> Result<Json<BookableSlots>, AppError> {
    let day = resolve_day(&query)?;

    let availability = availability_repo::get_availability_by_professor(&state.db_pool, &professor_id)
        .await?
        .ok_or_else(|| NestError::NotFound("No availability settings found.".to_string()))?;

    let booked: HashMap<String, i64> = reservation_repo::count_reservations_by_time(&state.db_pool, &professor_id, &day)
        .await?
        .into_iter()
        .map(|slot| (slot.time, slot.count))
        .collect();

    let slots = bookable_slots(
        &availability.weekly_schedule,
        &day,
        &availability.unavailable_times,
        &booked,
    )?;

    Ok(Json(BookableSlots {
        professor_id,
        day,
        slots,
    }))
}

#[axum::debug_handler]
pub async fn generate_slot_list(AppQuery(query): AppQuery<SlotQuery>) -> Result<Json<GeneratedSlots>, AppError> {
    let interval = query.interval.unwrap_or(DEFAULT_INTERVAL_MINUTES);
    let slots = generate_slots(&query.start, &query.end, interval)?.collect();

    Ok(Json(GeneratedSlots { slots }))
}

/// Books an office-hour slot.
///
/// The professor's availability row is locked for the length of the
/// transaction, so the capacity check and the insert cannot interleave with a
/// concurrent booking.
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateReservationRequest>,
) -> Result<Json<CreateReservationResponse>, AppError> {
    let time = normalize_time(&payload.time)?;
    check_reservation_day(&payload.day, &payload.date)?;

    let professor_name = course_repo::get_professor_name(&state.db_pool, &payload.professor_id)
        .await?
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let mut tx = state.db_pool.begin().await.map_err(eyre::Report::from)?;

    let availability = availability_repo::lock_availability(&mut *tx, &payload.professor_id)
        .await?
        .ok_or_else(|| NestError::NotFound("No availability settings found.".to_string()))?;

    let booked = reservation_repo::count_reservations_at(&mut *tx, &payload.professor_id, &payload.day, &time).await?;

    check_bookable(
        &availability.weekly_schedule,
        &payload.day,
        &time,
        &availability.unavailable_times,
        booked,
    )?;

    let reservation = reservation_repo::insert_reservation(
        &mut *tx,
        &reservation_repo::NewReservation {
            student_name: &payload.student_name,
            professor_id: &payload.professor_id,
            professor_name: &professor_name,
            day: &payload.day,
            date: &payload.date,
            time: &time,
            user_id: &payload.user_id,
        },
    )
    .await?;

    tx.commit().await.map_err(eyre::Report::from)?;
    info!(
        "Reservation {} booked with professor {} on {} {}",
        reservation.id, reservation.professor_id, reservation.day, reservation.time
    );

    Ok(Json(CreateReservationResponse {
        message: "Reservation saved successfully!".to_string(),
        id: reservation.id,
    }))
}

/// All reservations, or those of one user when `user_id` is given.
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
    AppQuery(filter): AppQuery<ReservationFilter>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = match filter.user_id {
        Some(user_id) => reservation_repo::get_reservations_by_user(&state.db_pool, &user_id).await?,
        None => reservation_repo::list_reservations(&state.db_pool).await?,
    };

    Ok(Json(reservations.into_iter().map(Reservation::from).collect()))
}

#[axum::debug_handler]
pub async fn get_professor_reservations(
    State(state): State<Arc<ApiState>>,
    AppPath(professor_id): AppPath<String>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = reservation_repo::get_reservations_by_professor(&state.db_pool, &professor_id).await?;

    Ok(Json(reservations.into_iter().map(Reservation::from).collect()))
}

#[axum::debug_handler]
pub async fn get_professor_reservations_by_email(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<EmailQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let professor = professor_repo::get_professor_by_email(&state.db_pool, &query.email)
        .await?
        .ok_or_else(|| NestError::NotFound("Professor not found".to_string()))?;

    let reservations =
        reservation_repo::get_reservations_by_professor(&state.db_pool, &professor.professor_id).await?;

    Ok(Json(reservations.into_iter().map(Reservation::from).collect()))
}
