use crate::models::{DbComment, DbProject};
use chrono::Utc;
use eyre::Result;
use nest_core::models::project::ProjectInfo;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, username, project_name, description, language, stars, \
    updated_at, license, forks, watchers, contributors, is_private, default_branch, \
    repository_url, text_extracted, summary, image_preview_urls, generated_image_url, \
    student_id, course, course_code, views, created_at";

pub async fn create_project(pool: &Pool<Postgres>, info: &ProjectInfo) -> Result<DbProject> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating project: id={}, username={}, project_name={}",
        id,
        info.username,
        info.project_name
    );

    let sql = format!(
        r#"
        INSERT INTO projects (
            id, username, project_name, description, language, stars, updated_at, license,
            forks, watchers, contributors, is_private, default_branch, repository_url,
            text_extracted, summary, image_preview_urls, generated_image_url, student_id,
            course, course_code, views, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
            $17, $18, $19, $20, $21, 0, $22)
        RETURNING {}
        "#,
        PROJECT_COLUMNS
    );

    let project = sqlx::query_as::<_, DbProject>(&sql)
        .bind(id)
        .bind(&info.username)
        .bind(&info.project_name)
        .bind(&info.description)
        .bind(&info.language)
        .bind(info.stars)
        .bind(&info.updated_at)
        .bind(&info.license)
        .bind(info.forks)
        .bind(info.watchers)
        .bind(&info.contributors)
        .bind(info.is_private)
        .bind(&info.default_branch)
        .bind(&info.repository_url)
        .bind(&info.text_extracted)
        .bind(&info.summary)
        .bind(&info.image_preview_urls)
        .bind(&info.generated_image_url)
        .bind(&info.student_id)
        .bind(&info.course)
        .bind(&info.course_code)
        .bind(now)
        .fetch_one(pool)
        .await?;

    Ok(project)
}

pub async fn list_projects(pool: &Pool<Postgres>) -> Result<Vec<DbProject>> {
    let sql = format!(
        "SELECT {} FROM projects ORDER BY created_at DESC",
        PROJECT_COLUMNS
    );

    let projects = sqlx::query_as::<_, DbProject>(&sql).fetch_all(pool).await?;

    Ok(projects)
}

/// Fetches a project and counts the visit.
pub async fn view_project(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProject>> {
    let sql = format!(
        "UPDATE projects SET views = views + 1 WHERE id = $1 RETURNING {}",
        PROJECT_COLUMNS
    );

    let project = sqlx::query_as::<_, DbProject>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(project)
}

pub async fn update_project(pool: &Pool<Postgres>, id: Uuid, info: &ProjectInfo) -> Result<Option<DbProject>> {
    let sql = format!(
        r#"
        UPDATE projects
        SET username = $2, project_name = $3, description = $4, language = $5, stars = $6,
            updated_at = $7, license = $8, forks = $9, watchers = $10, contributors = $11,
            is_private = $12, default_branch = $13, repository_url = $14,
            text_extracted = $15, summary = $16, image_preview_urls = $17,
            generated_image_url = $18, student_id = $19, course = $20, course_code = $21
        WHERE id = $1
        RETURNING {}
        "#,
        PROJECT_COLUMNS
    );

    let project = sqlx::query_as::<_, DbProject>(&sql)
        .bind(id)
        .bind(&info.username)
        .bind(&info.project_name)
        .bind(&info.description)
        .bind(&info.language)
        .bind(info.stars)
        .bind(&info.updated_at)
        .bind(&info.license)
        .bind(info.forks)
        .bind(info.watchers)
        .bind(&info.contributors)
        .bind(info.is_private)
        .bind(&info.default_branch)
        .bind(&info.repository_url)
        .bind(&info.text_extracted)
        .bind(&info.summary)
        .bind(&info.image_preview_urls)
        .bind(&info.generated_image_url)
        .bind(&info.student_id)
        .bind(&info.course)
        .bind(&info.course_code)
        .fetch_optional(pool)
        .await?;

    Ok(project)
}

pub async fn delete_project(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_comments(pool: &Pool<Postgres>, project_ids: &[Uuid]) -> Result<Vec<DbComment>> {
    let comments = sqlx::query_as::<_, DbComment>(
        r#"
        SELECT id, project_id, username, content, created_at
        FROM project_comments
        WHERE project_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Adds a comment; `None` when the project does not exist.
pub async fn add_comment(
    pool: &Pool<Postgres>,
    project_id: Uuid,
    username: &str,
    content: &str,
) -> Result<Option<DbComment>> {
    let now = Utc::now();

    let comment = sqlx::query_as::<_, DbComment>(
        r#"
        INSERT INTO project_comments (project_id, username, content, created_at)
        SELECT id, $2, $3, $4 FROM projects WHERE id = $1
        RETURNING id, project_id, username, content, created_at
        "#,
    )
    .bind(project_id)
    .bind(username)
    .bind(content)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}
