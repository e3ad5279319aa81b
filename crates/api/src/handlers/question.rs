use axum::{
    extract::State,
    Json,
};
use eyre::Result;
use nest_core::{
    errors::NestError,
    models::question::{
        Answer, CreateCodeAnswerRequest, CreateGeneralAnswerRequest, CreateQuestionRequest,
        Question, ResolveAnswerResponse, StudentScores,
    },
    scoring::{apply_points, display_title, resolution_deltas, title_for, Category},
};
use nest_db::{
    models::{DbAnswer, DbScore, DbUser},
    repositories::{question as question_repo, score as score_repo, user as user_repo},
    DbPool,
};
use sqlx::{Executor, PgConnection, Postgres};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath},
    middleware::error_handling::AppError,
    ApiState,
};

fn question_not_found(id: Uuid) -> NestError {
    NestError::NotFound(format!("Question {} not found", id))
}

async fn find_user<'e, E>(executor: E, github_id: &str) -> Result<DbUser, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    user_repo::get_user_by_github_id(executor, github_id)
        .await?
        .ok_or_else(|| AppError(NestError::NotFound(format!("User {} not found", github_id))))
}

/// Title the user currently displays next to new answers.
fn current_title(scores: &[DbScore]) -> String {
    display_title(scores.iter().map(|score| {
        (
            Category::from_label(&score.category),
            score.points,
            score.title.as_str(),
        )
    }))
}

/// Moves a student's points in `category` by `delta` and returns the new title.
async fn adjust_score(
    conn: &mut PgConnection,
    student_id: &str,
    category: Category,
    delta: f64,
) -> Result<String, AppError> {
    let current = score_repo::get_points_for_update(&mut *conn, student_id, category)
        .await?
        .unwrap_or(0.0);
    let points = apply_points(current, delta);
    let title = title_for(category, points);

    score_repo::upsert_score(&mut *conn, student_id, category, points, &title).await?;

    Ok(title)
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Question title is required".to_string(),
        )));
    }

    find_user(&state.db_pool, &payload.user_id).await?;

    let question = question_repo::create_question(
        &state.db_pool,
        &question_repo::NewQuestion {
            title: &payload.title,
            description: &payload.description,
            category: Category::from_label(&payload.category),
            custom_categories: &payload.custom_categories,
            code: &payload.code,
            user_id: &payload.user_id,
        },
    )
    .await?;
    info!("Question {} posted in {}", question.id, question.category);

    Ok(Json(question.into_question(Vec::new())))
}

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = question_repo::list_questions(&state.db_pool).await?;
    let ids: Vec<Uuid> = questions.iter().map(|question| question.id).collect();

    let mut answers: HashMap<Uuid, Vec<DbAnswer>> = HashMap::new();
    for answer in question_repo::get_answers(&state.db_pool, &ids).await? {
        answers.entry(answer.question_id).or_default().push(answer);
    }

    Ok(Json(
        questions
            .into_iter()
            .map(|question| {
                let answers = answers.remove(&question.id).unwrap_or_default();
                question.into_question(answers)
            })
            .collect(),
    ))
}

#[axum::debug_handler]
pub async fn get_question(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Question>, AppError> {
    let question = question_repo::get_question(&state.db_pool, id)
        .await?
        .ok_or_else(|| question_not_found(id))?;
    let answers = question_repo::get_answers(&state.db_pool, &[id]).await?;

    Ok(Json(question.into_question(answers)))
}

async fn add_answer(
    pool: &DbPool,
    question_id: Uuid,
    line_number: Option<i32>,
    text: &str,
    user_id: &str,
) -> Result<Answer, AppError> {
    if text.trim().is_empty() {
        return Err(AppError(NestError::Validation(
            "Answer text is required".to_string(),
        )));
    }

    if question_repo::get_question(pool, question_id).await?.is_none() {
        return Err(AppError(question_not_found(question_id)));
    }

    let user = find_user(pool, user_id).await?;
    let scores = score_repo::get_scores(pool, &user.student_id).await?;
    let user_title = current_title(&scores);

    let answer = question_repo::insert_answer(pool, question_id, line_number, text, user_id, &user_title).await?;

    Ok(answer.into())
}

#[axum::debug_handler]
pub async fn add_code_answer(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateCodeAnswerRequest>,
) -> Result<Json<Answer>, AppError> {
    if payload.line_number < 0 {
        return Err(AppError(NestError::Validation(
            "Line number must not be negative".to_string(),
        )));
    }

    let answer = add_answer(
        &state.db_pool,
        id,
        Some(payload.line_number),
        &payload.text,
        &payload.user_id,
    )
    .await?;

    Ok(Json(answer))
}

#[axum::debug_handler]
pub async fn add_general_answer(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateGeneralAnswerRequest>,
) -> Result<Json<Answer>, AppError> {
    let answer = add_answer(&state.db_pool, id, None, &payload.text, &payload.user_id).await?;

    Ok(Json(answer))
}

/// Flips the resolved flag of one answer and moves both authors' points.
///
/// Runs in one transaction holding row locks on the answer and the touched
/// score rows, so concurrent toggles of the same answer apply one at a time.
/// Every query goes through that transaction's connection.
async fn toggle_resolution(
    pool: &DbPool,
    question_id: Uuid,
    line_number: Option<i32>,
    index: usize,
) -> Result<ResolveAnswerResponse, AppError> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    let question = question_repo::get_question(&mut *tx, question_id)
        .await?
        .ok_or_else(|| question_not_found(question_id))?;

    let index = i64::try_from(index)
        .map_err(|_| NestError::InvalidArgument(format!("Answer index {} is too large", index)))?;
    let answer = question_repo::nth_answer_for_update(&mut *tx, question_id, line_number, index)
        .await?
        .ok_or_else(|| NestError::NotFound("Answer not found".to_string()))?;

    let answer_user = find_user(&mut *tx, &answer.user_id).await?;
    let question_user = find_user(&mut *tx, &question.user_id).await?;

    let resolved = !answer.resolved;
    let category = Category::from_label(&question.category);
    let (answer_delta, question_delta) = resolution_deltas(resolved);

    let answer_title = adjust_score(&mut *tx, &answer_user.student_id, category, answer_delta).await?;
    let question_title = adjust_score(&mut *tx, &question_user.student_id, category, question_delta).await?;

    question_repo::set_resolved(&mut *tx, answer.id, resolved, &answer_title).await?;
    if line_number.is_some() {
        question_repo::update_code_answer_titles(&mut *tx, question_id, &answer.user_id, &answer_title).await?;
    }

    let has_resolved_answer =
        question_repo::has_resolved_answer(&mut *tx, question_id, &answer.user_id, line_number.is_some()).await?;

    tx.commit().await.map_err(eyre::Report::from)?;
    info!(
        "Answer {} on question {} marked resolved={}",
        answer.id, question_id, resolved
    );

    Ok(ResolveAnswerResponse {
        message: "Answer resolve status toggled".to_string(),
        resolved,
        answer_user_new_title: answer_title,
        question_user_new_title: question_title,
        has_resolved_answer,
    })
}

#[axum::debug_handler]
pub async fn resolve_general_answer(
    State(state): State<Arc<ApiState>>,
    AppPath((id, index)): AppPath<(Uuid, usize)>,
) -> Result<Json<ResolveAnswerResponse>, AppError> {
    Ok(Json(toggle_resolution(&state.db_pool, id, None, index).await?))
}

#[axum::debug_handler]
pub async fn resolve_code_answer(
    State(state): State<Arc<ApiState>>,
    AppPath((id, line_number, index)): AppPath<(Uuid, i32, usize)>,
) -> Result<Json<ResolveAnswerResponse>, AppError> {
    Ok(Json(
        toggle_resolution(&state.db_pool, id, Some(line_number), index).await?,
    ))
}

#[axum::debug_handler]
pub async fn get_student_scores(
    State(state): State<Arc<ApiState>>,
    AppPath(student_id): AppPath<String>,
) -> Result<Json<StudentScores>, AppError> {
    let rows = score_repo::get_scores(&state.db_pool, &student_id).await?;

    let mut scores = BTreeMap::new();
    let mut titles = BTreeMap::new();
    for row in rows {
        let category = Category::from_label(&row.category);
        scores.insert(category, row.points);
        titles.insert(category, row.title);
    }

    Ok(Json(StudentScores {
        student_id,
        scores,
        titles,
    }))
}
