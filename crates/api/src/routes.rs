pub mod course;
pub mod evaluation;
pub mod health;
pub mod portfolio;
pub mod problem;
pub mod professor;
pub mod question;
pub mod schedule;
pub mod user;
