use crate::models::DbProblem;
use chrono::Utc;
use eyre::Result;
use nest_core::models::problem::CreateProblemRequest;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_problem(pool: &Pool<Postgres>, problem: &CreateProblemRequest) -> Result<DbProblem> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating problem: id={}, title={}", id, problem.title);

    let problem = sqlx::query_as::<_, DbProblem>(
        r#"
        INSERT INTO problems (
            id, title, description, input_description, output_description,
            sample_input, sample_output, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, description, input_description, output_description,
            sample_input, sample_output, created_at
        "#,
    )
    .bind(id)
    .bind(&problem.title)
    .bind(&problem.description)
    .bind(&problem.input_description)
    .bind(&problem.output_description)
    .bind(&problem.sample_input)
    .bind(&problem.sample_output)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(problem)
}

pub async fn list_problems(pool: &Pool<Postgres>) -> Result<Vec<DbProblem>> {
    let problems = sqlx::query_as::<_, DbProblem>(
        r#"
        SELECT id, title, description, input_description, output_description,
            sample_input, sample_output, created_at
        FROM problems
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(problems)
}

pub async fn get_problem(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProblem>> {
    let problem = sqlx::query_as::<_, DbProblem>(
        r#"
        SELECT id, title, description, input_description, output_description,
            sample_input, sample_output, created_at
        FROM problems
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(problem)
}
