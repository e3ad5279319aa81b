use crate::models::{DbAvailableProfessor, DbAvailableTimes, DbProfessor};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_professor(
    pool: &Pool<Postgres>,
    professor_id: &str,
    email: &str,
    name: Option<&str>,
) -> Result<DbProfessor> {
    let now = Utc::now();

    tracing::debug!("Creating professor: professor_id={}, email={}", professor_id, email);

    let professor = sqlx::query_as::<_, DbProfessor>(
        r#"
        INSERT INTO professors (professor_id, email, name, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING professor_id, email, name, created_at
        "#,
    )
    .bind(professor_id)
    .bind(email)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(professor)
}

pub async fn get_professor_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbProfessor>> {
    let professor = sqlx::query_as::<_, DbProfessor>(
        r#"
        SELECT professor_id, email, name, created_at
        FROM professors
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(professor)
}

pub async fn get_professor_by_id(
    pool: &Pool<Postgres>,
    professor_id: &str,
) -> Result<Option<DbProfessor>> {
    let professor = sqlx::query_as::<_, DbProfessor>(
        r#"
        SELECT professor_id, email, name, created_at
        FROM professors
        WHERE professor_id = $1
        "#,
    )
    .bind(professor_id)
    .fetch_optional(pool)
    .await?;

    Ok(professor)
}

pub async fn list_professors(pool: &Pool<Postgres>) -> Result<Vec<DbProfessor>> {
    let professors = sqlx::query_as::<_, DbProfessor>(
        r#"
        SELECT professor_id, email, name, created_at
        FROM professors
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(professors)
}

/// Professors with saved office hours, named after their first course.
pub async fn list_available_professors(pool: &Pool<Postgres>) -> Result<Vec<DbAvailableProfessor>> {
    let professors = sqlx::query_as::<_, DbAvailableProfessor>(
        r#"
        SELECT a.professor_id, a.email,
            (SELECT c.professor FROM courses c
             WHERE c.professor_id = a.professor_id
             ORDER BY c.code ASC
             LIMIT 1) AS name
        FROM availability a
        ORDER BY a.professor_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(professors)
}

/// Available-time entries of all listed professors, oldest first.
pub async fn get_available_times(
    pool: &Pool<Postgres>,
    professor_ids: &[String],
) -> Result<Vec<DbAvailableTimes>> {
    let entries = sqlx::query_as::<_, DbAvailableTimes>(
        r#"
        SELECT id, professor_id, date, times
        FROM professor_available_times
        WHERE professor_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(professor_ids)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn add_available_times(
    pool: &Pool<Postgres>,
    professor_id: &str,
    date: &str,
    times: &[String],
) -> Result<DbAvailableTimes> {
    tracing::debug!(
        "Adding available times: professor_id={}, date={}, count={}",
        professor_id,
        date,
        times.len()
    );

    let entry = sqlx::query_as::<_, DbAvailableTimes>(
        r#"
        INSERT INTO professor_available_times (professor_id, date, times)
        VALUES ($1, $2, $3)
        RETURNING id, professor_id, date, times
        "#,
    )
    .bind(professor_id)
    .bind(date)
    .bind(times)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}
