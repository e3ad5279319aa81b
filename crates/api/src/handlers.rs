pub mod course;
pub mod evaluation;
pub mod portfolio;
pub mod problem;
pub mod professor;
pub mod question;
pub mod schedule;
pub mod student;
pub mod user;
