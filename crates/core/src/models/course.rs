use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub professor: String,
    pub professor_id: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCode {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCoursesResponse {
    pub message: String,
    pub saved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCoursesResponse {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub department: String,
    pub course_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseWithStudents {
    pub course: Course,
    pub students: Vec<Student>,
}

/// One roster line: a student taking one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudentRequest {
    pub name: String,
    pub student_id: String,
    pub department: String,
    pub course_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub message: String,
    pub created: usize,
    pub updated: usize,
    pub duplicates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnenrollStudentRequest {
    pub student_id: String,
    pub course_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCourses {
    pub student_id: String,
    pub name: String,
    pub department: String,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentFilter {
    pub course_code: Option<String>,
}
