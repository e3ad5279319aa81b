use crate::models::DbAvailability;
use chrono::Utc;
use eyre::Result;
use nest_core::slots::{UnavailableTime, WeeklySchedule};
use sqlx::types::Json;
use sqlx::{PgConnection, Pool, Postgres};

/// Inserts or replaces the office-hour settings of a professor.
pub async fn upsert_availability(
    pool: &Pool<Postgres>,
    professor_id: &str,
    email: &str,
    weekly_schedule: &WeeklySchedule,
    unavailable_times: &[UnavailableTime],
) -> Result<DbAvailability> {
    let now = Utc::now();

    tracing::debug!("Saving availability: professor_id={}", professor_id);

    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        INSERT INTO availability (professor_id, email, weekly_schedule, unavailable_times, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (professor_id) DO UPDATE
        SET email = EXCLUDED.email,
            weekly_schedule = EXCLUDED.weekly_schedule,
            unavailable_times = EXCLUDED.unavailable_times,
            updated_at = EXCLUDED.updated_at
        RETURNING professor_id, email, weekly_schedule, unavailable_times, updated_at
        "#,
    )
    .bind(professor_id)
    .bind(email)
    .bind(Json(weekly_schedule))
    .bind(Json(unavailable_times))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(availability)
}

pub async fn get_availability_by_professor(
    pool: &Pool<Postgres>,
    professor_id: &str,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT professor_id, email, weekly_schedule, unavailable_times, updated_at
        FROM availability
        WHERE professor_id = $1
        "#,
    )
    .bind(professor_id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

pub async fn get_availability_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT professor_id, email, weekly_schedule, unavailable_times, updated_at
        FROM availability
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

/// Reads a professor's availability and holds a row lock on it until the
/// surrounding transaction ends. Bookings for the same professor serialize on
/// this lock.
pub async fn lock_availability(
    conn: &mut PgConnection,
    professor_id: &str,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT professor_id, email, weekly_schedule, unavailable_times, updated_at
        FROM availability
        WHERE professor_id = $1
        FOR UPDATE
        "#,
    )
    .bind(professor_id)
    .fetch_optional(conn)
    .await?;

    Ok(availability)
}
