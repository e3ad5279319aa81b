use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub custom_categories: Vec<String>,
    #[serde(default)]
    pub code: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub custom_categories: Vec<String>,
    pub code: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Answers attached to a line of `code`, keyed by line number.
    pub code_answers: BTreeMap<i32, Vec<Answer>>,
    pub general_answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub user_id: String,
    pub user_title: String,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCodeAnswerRequest {
    pub line_number: i32,
    pub text: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGeneralAnswerRequest {
    pub text: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveAnswerResponse {
    pub message: String,
    pub resolved: bool,
    pub answer_user_new_title: String,
    pub question_user_new_title: String,
    pub has_resolved_answer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentScores {
    pub student_id: String,
    pub scores: BTreeMap<Category, f64>,
    pub titles: BTreeMap<Category, String>,
}
