use std::collections::BTreeMap;

use crate::models::{DbEvaluationCriteria, DbEvaluationResult, DbTeamMemberRow};
use chrono::Utc;
use eyre::Result;
use nest_core::models::evaluation::{EvaluationSubmission, Team, TeamMember};
use sqlx::types::Json;
use sqlx::{Executor, PgConnection, Pool, Postgres};

pub async fn create_criteria(
    pool: &Pool<Postgres>,
    course_code: &str,
    criteria: &[String],
    max_teams: u32,
) -> Result<DbEvaluationCriteria> {
    let now = Utc::now();

    tracing::debug!(
        "Creating evaluation criteria: course_code={}, max_teams={}",
        course_code,
        max_teams
    );

    let criteria = sqlx::query_as::<_, DbEvaluationCriteria>(
        r#"
        INSERT INTO evaluation_criteria (course_code, criteria, max_teams, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING course_code, criteria, max_teams, created_at
        "#,
    )
    .bind(course_code)
    .bind(criteria)
    .bind(i64::from(max_teams))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(criteria)
}

pub async fn update_criteria(
    pool: &Pool<Postgres>,
    course_code: &str,
    criteria: &[String],
    max_teams: u32,
) -> Result<Option<DbEvaluationCriteria>> {
    let criteria = sqlx::query_as::<_, DbEvaluationCriteria>(
        r#"
        UPDATE evaluation_criteria
        SET criteria = $2, max_teams = $3
        WHERE course_code = $1
        RETURNING course_code, criteria, max_teams, created_at
        "#,
    )
    .bind(course_code)
    .bind(criteria)
    .bind(i64::from(max_teams))
    .fetch_optional(pool)
    .await?;

    Ok(criteria)
}

pub async fn get_criteria(
    pool: &Pool<Postgres>,
    course_code: &str,
) -> Result<Option<DbEvaluationCriteria>> {
    let criteria = sqlx::query_as::<_, DbEvaluationCriteria>(
        r#"
        SELECT course_code, criteria, max_teams, created_at
        FROM evaluation_criteria
        WHERE course_code = $1
        "#,
    )
    .bind(course_code)
    .fetch_optional(pool)
    .await?;

    Ok(criteria)
}

/// Reads the criteria row and locks it, serializing team changes of the
/// course until the transaction ends.
pub async fn get_criteria_for_update(
    conn: &mut PgConnection,
    course_code: &str,
) -> Result<Option<DbEvaluationCriteria>> {
    let criteria = sqlx::query_as::<_, DbEvaluationCriteria>(
        r#"
        SELECT course_code, criteria, max_teams, created_at
        FROM evaluation_criteria
        WHERE course_code = $1
        FOR UPDATE
        "#,
    )
    .bind(course_code)
    .fetch_optional(conn)
    .await?;

    Ok(criteria)
}

/// Teams of a course in creation order, members in join order.
pub async fn get_teams<'e, E>(executor: E, course_code: &str) -> Result<Vec<Team>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, DbTeamMemberRow>(
        r#"
        SELECT t.team_name, m.student_id, m.name
        FROM teams t
        LEFT JOIN team_members m
            ON m.course_code = t.course_code AND m.team_name = t.team_name
        WHERE t.course_code = $1
        ORDER BY t.position ASC, m.position ASC
        "#,
    )
    .bind(course_code)
    .fetch_all(executor)
    .await?;

    let mut teams: Vec<Team> = Vec::new();
    for row in rows {
        if teams.last().map(|team| &team.team_name) != Some(&row.team_name) {
            teams.push(Team {
                team_name: row.team_name.clone(),
                students: Vec::new(),
            });
        }
        if let (Some(student_id), Some(name), Some(team)) = (row.student_id, row.name, teams.last_mut()) {
            team.students.push(TeamMember { student_id, name });
        }
    }

    Ok(teams)
}

/// Replaces every team of a course with `teams`.
pub async fn replace_teams(conn: &mut PgConnection, course_code: &str, teams: &[Team]) -> Result<()> {
    sqlx::query("DELETE FROM teams WHERE course_code = $1")
        .bind(course_code)
        .execute(&mut *conn)
        .await?;

    for (team_position, team) in teams.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO teams (course_code, team_name, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(course_code)
        .bind(&team.team_name)
        .bind(team_position as i32)
        .execute(&mut *conn)
        .await?;

        for (member_position, member) in team.students.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO team_members (course_code, team_name, student_id, name, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(course_code)
            .bind(&team.team_name)
            .bind(&member.student_id)
            .bind(&member.name)
            .bind(member_position as i32)
            .execute(&mut *conn)
            .await?;
        }
    }

    tracing::debug!("Saved {} teams for course {}", teams.len(), course_code);
    Ok(())
}

/// Stores peer-review assignments of a course, dropping earlier ones.
pub async fn replace_assignments(
    pool: &Pool<Postgres>,
    course_code: &str,
    assignments: &BTreeMap<String, Vec<String>>,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM evaluation_assignments WHERE course_code = $1")
        .bind(course_code)
        .execute(&mut *tx)
        .await?;

    for (student_id, team_names) in assignments {
        sqlx::query(
            r#"
            INSERT INTO evaluation_assignments (course_code, student_id, team_names)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(course_code)
        .bind(student_id)
        .bind(team_names)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn get_assignments(
    pool: &Pool<Postgres>,
    course_code: &str,
    student_id: &str,
) -> Result<Option<Vec<String>>> {
    let team_names = sqlx::query_scalar::<_, Vec<String>>(
        r#"
        SELECT team_names FROM evaluation_assignments
        WHERE course_code = $1 AND student_id = $2
        "#,
    )
    .bind(course_code)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(team_names)
}

/// Stores a peer evaluation. Returns `false` when the evaluator already
/// evaluated that team.
pub async fn insert_evaluation(pool: &Pool<Postgres>, submission: &EvaluationSubmission) -> Result<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO evaluation_results (course_code, team_name, evaluator_id, scores, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT ON CONSTRAINT one_evaluation_per_team DO NOTHING
        "#,
    )
    .bind(&submission.course_code)
    .bind(&submission.team_name)
    .bind(&submission.evaluator_id)
    .bind(Json(&submission.scores))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn list_evaluation_results(
    pool: &Pool<Postgres>,
    course_code: &str,
) -> Result<Vec<DbEvaluationResult>> {
    let results = sqlx::query_as::<_, DbEvaluationResult>(
        r#"
        SELECT id, course_code, team_name, evaluator_id, scores, created_at
        FROM evaluation_results
        WHERE course_code = $1
        ORDER BY id ASC
        "#,
    )
    .bind(course_code)
    .fetch_all(pool)
    .await?;

    Ok(results)
}
