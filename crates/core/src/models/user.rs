use serde::{Deserialize, Serialize};

use super::course::Course;

/// Profile a student fills in after their first GitHub login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub school_email: String,
    pub student_id: String,
    pub age: i32,
    pub contact: String,
    pub github_username: String,
    pub github_name: String,
    pub github_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub github_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub github_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub github_id: String,
    pub student_id: String,
}

/// Courses a signed-in user sees on their dashboard.
///
/// Students are found by GitHub username. When no student matches, the
/// username is treated as a professor email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserCourses {
    #[serde(rename_all = "camelCase")]
    Student {
        name: String,
        github_username: String,
        student_id: String,
        department: String,
        courses: Vec<Course>,
    },
    #[serde(rename_all = "camelCase")]
    Professor {
        name: String,
        email: String,
        professor_id: String,
        courses: Vec<Course>,
    },
}
