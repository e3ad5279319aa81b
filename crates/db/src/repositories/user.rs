use crate::models::DbUser;
use chrono::Utc;
use eyre::Result;
use nest_core::models::user::UserInfo;
use sqlx::{Executor, Pool, Postgres};

pub async fn create_user(pool: &Pool<Postgres>, user: &UserInfo) -> Result<DbUser> {
    let now = Utc::now();

    tracing::debug!(
        "Creating user: github_id={}, student_id={}",
        user.github_id,
        user.student_id
    );

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (
            github_id, github_username, github_name, name, school_email,
            student_id, age, contact, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING github_id, github_username, github_name, name, school_email,
            student_id, age, contact, created_at
        "#,
    )
    .bind(&user.github_id)
    .bind(&user.github_username)
    .bind(&user.github_name)
    .bind(&user.name)
    .bind(&user.school_email)
    .bind(&user.student_id)
    .bind(user.age)
    .bind(&user.contact)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Works on the pool or inside a transaction.
pub async fn get_user_by_github_id<'e, E>(executor: E, github_id: &str) -> Result<Option<DbUser>>
where
    E: Executor<'e, Database = Postgres>,
{
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT github_id, github_username, github_name, name, school_email,
            student_id, age, contact, created_at
        FROM users
        WHERE github_id = $1
        "#,
    )
    .bind(github_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_github_username(
    pool: &Pool<Postgres>,
    github_username: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT github_id, github_username, github_name, name, school_email,
            student_id, age, contact, created_at
        FROM users
        WHERE github_username = $1
        ORDER BY created_at ASC
        LIMIT 1
        "#,
    )
    .bind(github_username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Finds a user holding either the GitHub id or the student id.
pub async fn find_user_by_github_or_student_id(
    pool: &Pool<Postgres>,
    github_id: &str,
    student_id: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT github_id, github_username, github_name, name, school_email,
            student_id, age, contact, created_at
        FROM users
        WHERE github_id = $1 OR student_id = $2
        LIMIT 1
        "#,
    )
    .bind(github_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
