pub mod course;
pub mod evaluation;
pub mod problem;
pub mod professor;
pub mod project;
pub mod question;
pub mod schedule;
pub mod summary;
pub mod user;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
