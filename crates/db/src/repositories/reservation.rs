use crate::models::{DbReservation, DbSlotCount};
use chrono::Utc;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

/// Reservation fields supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewReservation<'a> {
    pub student_name: &'a str,
    pub professor_id: &'a str,
    pub professor_name: &'a str,
    pub day: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub user_id: &'a str,
}

pub async fn count_reservations_at(
    conn: &mut PgConnection,
    professor_id: &str,
    day: &str,
    time: &str,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE professor_id = $1 AND day = $2 AND time = $3
        "#,
    )
    .bind(professor_id)
    .bind(day)
    .bind(time)
    .fetch_one(conn)
    .await?;

    Ok(count)
}

/// Reservation counts of a professor's day, grouped by slot time.
pub async fn count_reservations_by_time(
    pool: &Pool<Postgres>,
    professor_id: &str,
    day: &str,
) -> Result<Vec<DbSlotCount>> {
    let counts = sqlx::query_as::<_, DbSlotCount>(
        r#"
        SELECT time, COUNT(*) AS count
        FROM reservations
        WHERE professor_id = $1 AND day = $2
        GROUP BY time
        "#,
    )
    .bind(professor_id)
    .bind(day)
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn insert_reservation(
    conn: &mut PgConnection,
    reservation: &NewReservation<'_>,
) -> Result<DbReservation> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating reservation: id={}, professor_id={}, day={}, time={}",
        id,
        reservation.professor_id,
        reservation.day,
        reservation.time
    );

    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations (
            id, student_name, professor_id, professor_name, day, date, time, user_id, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, student_name, professor_id, professor_name, day, date, time, user_id, created_at
        "#,
    )
    .bind(id)
    .bind(reservation.student_name)
    .bind(reservation.professor_id)
    .bind(reservation.professor_name)
    .bind(reservation.day)
    .bind(reservation.date)
    .bind(reservation.time)
    .bind(reservation.user_id)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(reservation)
}

pub async fn list_reservations(pool: &Pool<Postgres>) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, student_name, professor_id, professor_name, day, date, time, user_id, created_at
        FROM reservations
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_user(pool: &Pool<Postgres>, user_id: &str) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, student_name, professor_id, professor_name, day, date, time, user_id, created_at
        FROM reservations
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_professor(
    pool: &Pool<Postgres>,
    professor_id: &str,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, student_name, professor_id, professor_name, day, date, time, user_id, created_at
        FROM reservations
        WHERE professor_id = $1
        ORDER BY date ASC, time ASC
        "#,
    )
    .bind(professor_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}
