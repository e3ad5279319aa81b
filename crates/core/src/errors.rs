use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type NestResult<T> = Result<T, NestError>;
