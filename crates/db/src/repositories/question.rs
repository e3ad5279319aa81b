use crate::models::{DbAnswer, DbQuestion};
use chrono::Utc;
use eyre::Result;
use nest_core::scoring::Category;
use sqlx::{Executor, PgConnection, Pool, Postgres};
use uuid::Uuid;

/// Question fields supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewQuestion<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: Category,
    pub custom_categories: &'a [String],
    pub code: &'a str,
    pub user_id: &'a str,
}

pub async fn create_question(pool: &Pool<Postgres>, question: &NewQuestion<'_>) -> Result<DbQuestion> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating question: id={}, category={}, user_id={}",
        id,
        question.category,
        question.user_id
    );

    let question = sqlx::query_as::<_, DbQuestion>(
        r#"
        INSERT INTO questions (id, title, description, category, custom_categories, code, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, description, category, custom_categories, code, user_id, created_at
        "#,
    )
    .bind(id)
    .bind(question.title)
    .bind(question.description)
    .bind(question.category.as_str())
    .bind(question.custom_categories)
    .bind(question.code)
    .bind(question.user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(question)
}

pub async fn list_questions(pool: &Pool<Postgres>) -> Result<Vec<DbQuestion>> {
    let questions = sqlx::query_as::<_, DbQuestion>(
        r#"
        SELECT id, title, description, category, custom_categories, code, user_id, created_at
        FROM questions
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

pub async fn get_question<'e, E>(executor: E, id: Uuid) -> Result<Option<DbQuestion>>
where
    E: Executor<'e, Database = Postgres>,
{
    let question = sqlx::query_as::<_, DbQuestion>(
        r#"
        SELECT id, title, description, category, custom_categories, code, user_id, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(question)
}

/// Answers of the given questions in posting order.
pub async fn get_answers(pool: &Pool<Postgres>, question_ids: &[Uuid]) -> Result<Vec<DbAnswer>> {
    let answers = sqlx::query_as::<_, DbAnswer>(
        r#"
        SELECT id, question_id, line_number, text, user_id, user_title, resolved, created_at
        FROM answers
        WHERE question_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(question_ids)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}

/// Adds an answer; `line_number` is `None` for a general answer.
pub async fn insert_answer(
    pool: &Pool<Postgres>,
    question_id: Uuid,
    line_number: Option<i32>,
    text: &str,
    user_id: &str,
    user_title: &str,
) -> Result<DbAnswer> {
    let now = Utc::now();

    tracing::debug!(
        "Adding answer: question_id={}, line_number={:?}, user_id={}",
        question_id,
        line_number,
        user_id
    );

    let answer = sqlx::query_as::<_, DbAnswer>(
        r#"
        INSERT INTO answers (question_id, line_number, text, user_id, user_title, resolved, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6)
        RETURNING id, question_id, line_number, text, user_id, user_title, resolved, created_at
        "#,
    )
    .bind(question_id)
    .bind(line_number)
    .bind(text)
    .bind(user_id)
    .bind(user_title)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(answer)
}

/// The `index`-th answer (0-based, posting order) on a line of the question,
/// or among its general answers when `line_number` is `None`. The row stays
/// locked until the transaction ends.
pub async fn nth_answer_for_update(
    conn: &mut PgConnection,
    question_id: Uuid,
    line_number: Option<i32>,
    index: i64,
) -> Result<Option<DbAnswer>> {
    let answer = sqlx::query_as::<_, DbAnswer>(
        r#"
        SELECT id, question_id, line_number, text, user_id, user_title, resolved, created_at
        FROM answers
        WHERE question_id = $1 AND line_number IS NOT DISTINCT FROM $2
        ORDER BY id ASC
        OFFSET $3
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(question_id)
    .bind(line_number)
    .bind(index)
    .fetch_optional(conn)
    .await?;

    Ok(answer)
}

pub async fn set_resolved(
    conn: &mut PgConnection,
    answer_id: i64,
    resolved: bool,
    user_title: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE answers
        SET resolved = $2, user_title = $3
        WHERE id = $1
        "#,
    )
    .bind(answer_id)
    .bind(resolved)
    .bind(user_title)
    .execute(conn)
    .await?;

    Ok(())
}

/// Updates the title shown on every code answer a user posted on a question.
pub async fn update_code_answer_titles(
    conn: &mut PgConnection,
    question_id: Uuid,
    user_id: &str,
    user_title: &str,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE answers
        SET user_title = $3
        WHERE question_id = $1 AND user_id = $2 AND line_number IS NOT NULL
        "#,
    )
    .bind(question_id)
    .bind(user_id)
    .bind(user_title)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Whether the user has a resolved answer of the same kind (code or general)
/// on the question.
pub async fn has_resolved_answer(
    conn: &mut PgConnection,
    question_id: Uuid,
    user_id: &str,
    code_answer: bool,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM answers
            WHERE question_id = $1
                AND user_id = $2
                AND resolved
                AND (line_number IS NOT NULL) = $3
        )
        "#,
    )
    .bind(question_id)
    .bind(user_id)
    .bind(code_answer)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}
