use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A practice problem of the code-test pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub input_description: String,
    pub output_description: String,
    pub sample_input: String,
    pub sample_output: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProblemRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub input_description: String,
    #[serde(default)]
    pub output_description: String,
    #[serde(default)]
    pub sample_input: String,
    #[serde(default)]
    pub sample_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProblemResponse {
    pub id: Uuid,
}
