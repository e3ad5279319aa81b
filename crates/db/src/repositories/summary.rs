use crate::models::DbSummary;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_summary(pool: &Pool<Postgres>, final_summary: &str, image_data: &str) -> Result<DbSummary> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating summary: id={}", id);

    let summary = sqlx::query_as::<_, DbSummary>(
        r#"
        INSERT INTO summaries (id, final_summary, image_data, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, final_summary, image_data, created_at
        "#,
    )
    .bind(id)
    .bind(final_summary)
    .bind(image_data)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

pub async fn list_summaries(pool: &Pool<Postgres>) -> Result<Vec<DbSummary>> {
    let summaries = sqlx::query_as::<_, DbSummary>(
        r#"
        SELECT id, final_summary, image_data, created_at
        FROM summaries
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(summaries)
}
