//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies, so every
//! endpoint reports failures the same way: `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nest_core::errors::NestError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use nest_api::middleware::error_handling::AppError;
/// use nest_core::errors::NestError;
///
/// async fn handler(code: String) -> Result<Json<String>, AppError> {
///     if code.is_empty() {
///         return Err(AppError(NestError::Validation("Course code is required".into())));
///     }
///     Ok(Json(code))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub NestError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            NestError::NotFound(_) => StatusCode::NOT_FOUND,
            NestError::Validation(_) => StatusCode::BAD_REQUEST,
            NestError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            NestError::Conflict(_) => StatusCode::CONFLICT,
            NestError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        } else {
            tracing::warn!("Request rejected: {}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Allows `?` on `NestResult` inside handlers.
impl From<NestError> for AppError {
    fn from(err: NestError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors, except unique-key
/// violations, which mean the record already exists.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        if is_unique_violation(&err) {
            return AppError(NestError::Conflict("Record already exists".to_string()));
        }
        AppError(NestError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(NestError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(NestError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(NestError::Validation(rejection.body_text()))
    }
}

/// Whether the report was caused by a unique or primary key violation.
pub fn is_unique_violation(err: &eyre::Report) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .any(|cause| match cause {
            sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
            _ => false,
        })
}

/// Like the `From<eyre::Report>` conversion, with `message` as the conflict
/// text when the insert hit a unique key.
pub fn conflict_on_duplicate(message: &str) -> impl FnOnce(eyre::Report) -> AppError + '_ {
    move |err| {
        if is_unique_violation(&err) {
            AppError(NestError::Conflict(message.to_string()))
        } else {
            AppError(NestError::Database(err))
        }
    }
}

/// Maps a NestError straight to an HTTP response
pub fn map_error(err: NestError) -> Response {
    AppError(err).into_response()
}
