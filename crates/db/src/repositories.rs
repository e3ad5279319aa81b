pub mod availability;
pub mod course;
pub mod evaluation;
pub mod problem;
pub mod professor;
pub mod project;
pub mod question;
pub mod reservation;
pub mod score;
pub mod student;
pub mod summary;
pub mod user;
