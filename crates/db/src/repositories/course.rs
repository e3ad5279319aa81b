use crate::models::DbCourse;
use chrono::Utc;
use eyre::Result;
use nest_core::models::course::Course;
use sqlx::{Pool, Postgres};

pub async fn insert_courses(pool: &Pool<Postgres>, courses: &[Course]) -> Result<()> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for course in courses {
        tracing::debug!("Inserting course: code={}, name={}", course.code, course.name);
        sqlx::query(
            r#"
            INSERT INTO courses (code, name, professor, professor_id, day, time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&course.code)
        .bind(&course.name)
        .bind(&course.professor)
        .bind(&course.professor_id)
        .bind(&course.day)
        .bind(&course.time)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Returns the subset of `codes` that already exist.
pub async fn find_existing_codes(pool: &Pool<Postgres>, codes: &[String]) -> Result<Vec<String>> {
    let existing = sqlx::query_scalar::<_, String>(
        r#"
        SELECT code FROM courses
        WHERE code = ANY($1)
        ORDER BY code
        "#,
    )
    .bind(codes)
    .fetch_all(pool)
    .await?;

    Ok(existing)
}

pub async fn list_courses(pool: &Pool<Postgres>) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT code, name, professor, professor_id, day, time, created_at
        FROM courses
        ORDER BY code ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn get_course_by_code(pool: &Pool<Postgres>, code: &str) -> Result<Option<DbCourse>> {
    let course = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT code, name, professor, professor_id, day, time, created_at
        FROM courses
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(course)
}

pub async fn get_courses_by_codes(pool: &Pool<Postgres>, codes: &[String]) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT code, name, professor, professor_id, day, time, created_at
        FROM courses
        WHERE code = ANY($1)
        ORDER BY array_position($1, code::text)
        "#,
    )
    .bind(codes)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn get_courses_by_professor(
    pool: &Pool<Postgres>,
    professor_id: &str,
) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT code, name, professor, professor_id, day, time, created_at
        FROM courses
        WHERE professor_id = $1
        ORDER BY code ASC
        "#,
    )
    .bind(professor_id)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

/// Name of the professor as written on their first course, if they teach one.
pub async fn get_professor_name(pool: &Pool<Postgres>, professor_id: &str) -> Result<Option<String>> {
    let name = sqlx::query_scalar::<_, String>(
        r#"
        SELECT professor FROM courses
        WHERE professor_id = $1
        ORDER BY code ASC
        LIMIT 1
        "#,
    )
    .bind(professor_id)
    .fetch_optional(pool)
    .await?;

    Ok(name)
}

pub async fn delete_courses(pool: &Pool<Postgres>, codes: &[String]) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM courses
        WHERE code = ANY($1)
        "#,
    )
    .bind(codes)
    .execute(pool)
    .await?;

    tracing::debug!("Deleted {} courses", result.rows_affected());
    Ok(result.rows_affected())
}
