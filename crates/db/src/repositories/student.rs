use crate::models::DbStudent;
use chrono::Utc;
use eyre::Result;
use nest_core::roster::EnrollmentPlan;
use sqlx::{Pool, Postgres};

pub async fn create_student(
    pool: &Pool<Postgres>,
    student_id: &str,
    name: &str,
    department: &str,
    course_codes: &[String],
) -> Result<DbStudent> {
    let now = Utc::now();

    tracing::debug!("Creating student: student_id={}, name={}", student_id, name);

    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        INSERT INTO students (student_id, name, department, course_codes, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING student_id, name, department, course_codes, created_at
        "#,
    )
    .bind(student_id)
    .bind(name)
    .bind(department)
    .bind(course_codes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(student)
}

pub async fn get_student_by_id(pool: &Pool<Postgres>, student_id: &str) -> Result<Option<DbStudent>> {
    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT student_id, name, department, course_codes, created_at
        FROM students
        WHERE student_id = $1
        "#,
    )
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

pub async fn get_students_by_ids(pool: &Pool<Postgres>, student_ids: &[String]) -> Result<Vec<DbStudent>> {
    let students = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT student_id, name, department, course_codes, created_at
        FROM students
        WHERE student_id = ANY($1)
        "#,
    )
    .bind(student_ids)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

/// Lists students, only those enrolled in `course_code` when given.
pub async fn list_students(pool: &Pool<Postgres>, course_code: Option<&str>) -> Result<Vec<DbStudent>> {
    let students = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT student_id, name, department, course_codes, created_at
        FROM students
        WHERE $1::text IS NULL OR $1 = ANY(course_codes)
        ORDER BY student_id ASC
        "#,
    )
    .bind(course_code)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

/// Applies a roster upload in one transaction.
pub async fn apply_enrollment(pool: &Pool<Postgres>, plan: &EnrollmentPlan) -> Result<()> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for student in &plan.create {
        sqlx::query(
            r#"
            INSERT INTO students (student_id, name, department, course_codes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&student.student_id)
        .bind(&student.name)
        .bind(&student.department)
        .bind(&student.course_codes)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    for (student_id, course_code) in &plan.add_codes {
        sqlx::query(
            r#"
            UPDATE students
            SET course_codes = array_append(course_codes, $2)
            WHERE student_id = $1 AND NOT ($2 = ANY(course_codes))
            "#,
        )
        .bind(student_id)
        .bind(course_code)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        "Enrollment applied: created={}, codes_added={}",
        plan.create.len(),
        plan.add_codes.len()
    );
    Ok(())
}

pub async fn remove_course_code(
    pool: &Pool<Postgres>,
    student_id: &str,
    course_code: &str,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET course_codes = array_remove(course_codes, $2)
        WHERE student_id = $1
        "#,
    )
    .bind(student_id)
    .bind(course_code)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
