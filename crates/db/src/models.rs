use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use nest_core::models::{
    course::{Course, Student},
    evaluation::EvaluationCriteria,
    problem::Problem,
    professor::{AvailableProfessor, AvailableTimes},
    project::{Comment, Project, ProjectInfo},
    question::{Answer, Question},
    schedule::{Availability, Reservation},
    summary::Summary,
    user::UserInfo,
};
use nest_core::scoring::Category;
use nest_core::slots::{UnavailableTime, WeeklySchedule};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub github_id: String,
    pub github_username: String,
    pub github_name: String,
    pub name: String,
    pub school_email: String,
    pub student_id: String,
    pub age: i32,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for UserInfo {
    fn from(user: DbUser) -> Self {
        UserInfo {
            name: user.name,
            school_email: user.school_email,
            student_id: user.student_id,
            age: user.age,
            contact: user.contact,
            github_username: user.github_username,
            github_name: user.github_name,
            github_id: user.github_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourse {
    pub code: String,
    pub name: String,
    pub professor: String,
    pub professor_id: String,
    pub day: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbCourse> for Course {
    fn from(course: DbCourse) -> Self {
        Course {
            code: course.code,
            name: course.name,
            professor: course.professor,
            professor_id: course.professor_id,
            day: course.day,
            time: course.time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
    pub student_id: String,
    pub name: String,
    pub department: String,
    pub course_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbStudent> for Student {
    fn from(student: DbStudent) -> Self {
        Student {
            student_id: student.student_id,
            name: student.name,
            department: student.department,
            course_codes: student.course_codes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfessor {
    pub professor_id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailableTimes {
    pub id: i64,
    pub professor_id: String,
    pub date: String,
    pub times: Vec<String>,
}

impl From<DbAvailableTimes> for AvailableTimes {
    fn from(entry: DbAvailableTimes) -> Self {
        AvailableTimes {
            date: entry.date,
            times: entry.times,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailableProfessor {
    pub professor_id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<DbAvailableProfessor> for AvailableProfessor {
    fn from(professor: DbAvailableProfessor) -> Self {
        AvailableProfessor {
            professor_id: professor.professor_id,
            email: professor.email,
            name: professor
                .name
                .unwrap_or_else(|| crate::UNKNOWN_NAME.to_string()),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAvailability {
    pub professor_id: String,
    pub email: String,
    pub weekly_schedule: Json<WeeklySchedule>,
    pub unavailable_times: Json<Vec<UnavailableTime>>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAvailability> for Availability {
    fn from(availability: DbAvailability) -> Self {
        Availability {
            professor_id: availability.professor_id,
            email: availability.email,
            weekly_schedule: availability.weekly_schedule.0,
            unavailable_times: availability.unavailable_times.0,
            updated_at: availability.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub student_name: String,
    pub professor_id: String,
    pub professor_name: String,
    pub day: String,
    pub date: String,
    pub time: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbReservation> for Reservation {
    fn from(reservation: DbReservation) -> Self {
        Reservation {
            id: reservation.id,
            student_name: reservation.student_name,
            professor_id: reservation.professor_id,
            professor_name: reservation.professor_name,
            day: reservation.day,
            date: reservation.date,
            time: reservation.time,
            user_id: reservation.user_id,
            created_at: reservation.created_at,
        }
    }
}

/// Reservation count of one slot time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotCount {
    pub time: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvaluationCriteria {
    pub course_code: String,
    pub criteria: Vec<String>,
    pub max_teams: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbEvaluationCriteria> for EvaluationCriteria {
    fn from(criteria: DbEvaluationCriteria) -> Self {
        EvaluationCriteria {
            course_code: criteria.course_code,
            criteria: criteria.criteria,
            max_teams: criteria.max_teams.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }
}

/// One row of a teams-with-members join; member columns are null for empty
/// teams.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamMemberRow {
    pub team_name: String,
    pub student_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbEvaluationResult {
    pub id: i64,
    pub course_code: String,
    pub team_name: String,
    pub evaluator_id: String,
    pub scores: Json<BTreeMap<String, i64>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuestion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub custom_categories: Vec<String>,
    pub code: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl DbQuestion {
    /// Attaches answers, which must be in posting order, to the question.
    pub fn into_question(self, answers: Vec<DbAnswer>) -> Question {
        let mut code_answers: BTreeMap<i32, Vec<Answer>> = BTreeMap::new();
        let mut general_answers = Vec::new();

        for answer in answers.into_iter().filter(|answer| answer.question_id == self.id) {
            match answer.line_number {
                Some(line) => code_answers.entry(line).or_default().push(answer.into()),
                None => general_answers.push(answer.into()),
            }
        }

        Question {
            id: self.id,
            title: self.title,
            description: self.description,
            category: Category::from_label(&self.category),
            custom_categories: self.custom_categories,
            code: self.code,
            user_id: self.user_id,
            created_at: self.created_at,
            code_answers,
            general_answers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAnswer {
    pub id: i64,
    pub question_id: Uuid,
    /// `None` for general answers.
    pub line_number: Option<i32>,
    pub text: String,
    pub user_id: String,
    pub user_title: String,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbAnswer> for Answer {
    fn from(answer: DbAnswer) -> Self {
        Answer {
            text: answer.text,
            user_id: answer.user_id,
            user_title: answer.user_title,
            resolved: answer.resolved,
            created_at: answer.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScore {
    pub student_id: String,
    pub category: String,
    pub points: f64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProject {
    pub id: Uuid,
    pub username: String,
    pub project_name: String,
    pub description: String,
    pub language: String,
    pub stars: i32,
    pub updated_at: String,
    pub license: Option<String>,
    pub forks: i32,
    pub watchers: i32,
    pub contributors: String,
    pub is_private: bool,
    pub default_branch: String,
    pub repository_url: String,
    pub text_extracted: String,
    pub summary: String,
    pub image_preview_urls: Vec<String>,
    pub generated_image_url: String,
    pub student_id: String,
    pub course: String,
    pub course_code: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl DbProject {
    pub fn into_project(self, comments: Vec<Comment>) -> Project {
        Project {
            id: self.id,
            info: ProjectInfo {
                username: self.username,
                project_name: self.project_name,
                description: self.description,
                language: self.language,
                stars: self.stars,
                updated_at: self.updated_at,
                license: self.license,
                forks: self.forks,
                watchers: self.watchers,
                contributors: self.contributors,
                is_private: self.is_private,
                default_branch: self.default_branch,
                repository_url: self.repository_url,
                text_extracted: self.text_extracted,
                summary: self.summary,
                image_preview_urls: self.image_preview_urls,
                generated_image_url: self.generated_image_url,
                student_id: self.student_id,
                course: self.course,
                course_code: self.course_code,
            },
            views: self.views,
            comments,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbComment {
    pub id: i64,
    pub project_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbComment> for Comment {
    fn from(comment: DbComment) -> Self {
        Comment {
            username: comment.username,
            content: comment.content,
            timestamp: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProblem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub input_description: String,
    pub output_description: String,
    pub sample_input: String,
    pub sample_output: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbProblem> for Problem {
    fn from(problem: DbProblem) -> Self {
        Problem {
            id: problem.id,
            title: problem.title,
            description: problem.description,
            input_description: problem.input_description,
            output_description: problem.output_description,
            sample_input: problem.sample_input,
            sample_output: problem.sample_output,
            created_at: problem.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSummary {
    pub id: Uuid,
    pub final_summary: String,
    pub image_data: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbSummary> for Summary {
    fn from(summary: DbSummary) -> Self {
        Summary {
            id: summary.id,
            final_summary: summary.final_summary,
            image_data: summary.image_data,
            created_at: summary.created_at,
        }
    }
}
