use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Peer-evaluation settings of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    pub course_code: String,
    pub criteria: Vec<String>,
    pub max_teams: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub students: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseTeams {
    pub course_code: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRegistrationRequest {
    pub course_code: String,
    pub team_name: String,
    pub github_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationAssignments {
    pub evaluations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartEvaluationResponse {
    pub message: String,
    pub assigned_students: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub course_code: String,
    pub evaluator_id: String,
    pub team_name: String,
    pub scores: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    pub team_name: String,
    pub total_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProgress {
    pub team_name: String,
    pub total_scores: BTreeMap<String, i64>,
    pub total_score: i64,
}
