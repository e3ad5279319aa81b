use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_description() -> String {
    "No description".to_string()
}

fn default_language() -> String {
    "Unknown".to_string()
}

fn default_contributors() -> String {
    "None".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// Portfolio entry generated from a student's GitHub repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub username: String,
    pub project_name: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub stars: i32,
    pub updated_at: String,
    pub license: Option<String>,
    pub forks: i32,
    pub watchers: i32,
    #[serde(default = "default_contributors")]
    pub contributors: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub repository_url: String,
    pub text_extracted: String,
    pub summary: String,
    #[serde(default)]
    pub image_preview_urls: Vec<String>,
    pub generated_image_url: String,
    pub student_id: String,
    pub course: String,
    pub course_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: ProjectInfo,
    pub views: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub username: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProjectResponse {
    pub status: String,
    pub document_id: Uuid,
}
