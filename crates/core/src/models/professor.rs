use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professor {
    pub professor_id: String,
    pub email: String,
    pub name: Option<String>,
    pub available_times: Vec<AvailableTimes>,
    pub created_at: DateTime<Utc>,
}

/// Ad-hoc consultation times on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTimes {
    pub date: String,
    pub times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProfessorRequest {
    pub email: String,
    pub professor_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProfessorResponse {
    pub message: String,
    pub professor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateProfessorRequest {
    pub professor_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// A professor that published office hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableProfessor {
    pub professor_id: String,
    pub email: String,
    pub name: String,
}
