use crate::models::DbScore;
use eyre::Result;
use nest_core::scoring::Category;
use sqlx::{Executor, PgConnection, Postgres};

pub async fn get_scores<'e, E>(executor: E, student_id: &str) -> Result<Vec<DbScore>>
where
    E: Executor<'e, Database = Postgres>,
{
    let scores = sqlx::query_as::<_, DbScore>(
        r#"
        SELECT student_id, category, points, title
        FROM scores
        WHERE student_id = $1
        ORDER BY category ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(executor)
    .await?;

    Ok(scores)
}

/// Current points of a student in a category, locking the row if present.
pub async fn get_points_for_update(
    conn: &mut PgConnection,
    student_id: &str,
    category: Category,
) -> Result<Option<f64>> {
    let points = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT points FROM scores
        WHERE student_id = $1 AND category = $2
        FOR UPDATE
        "#,
    )
    .bind(student_id)
    .bind(category.as_str())
    .fetch_optional(conn)
    .await?;

    Ok(points)
}

pub async fn upsert_score(
    conn: &mut PgConnection,
    student_id: &str,
    category: Category,
    points: f64,
    title: &str,
) -> Result<()> {
    tracing::debug!(
        "Saving score: student_id={}, category={}, points={}",
        student_id,
        category,
        points
    );

    sqlx::query(
        r#"
        INSERT INTO scores (student_id, category, points, title)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (student_id, category) DO UPDATE
        SET points = EXCLUDED.points, title = EXCLUDED.title
        "#,
    )
    .bind(student_id)
    .bind(category.as_str())
    .bind(points)
    .bind(title)
    .execute(conn)
    .await?;

    Ok(())
}
