//! Extractors whose rejections are reported through [`AppError`], so a
//! malformed body, path or query string gets the same `{"error": ...}` body as
//! every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::middleware::error_handling::AppError;

/// `axum::Json` with an [`AppError`] rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` with an [`AppError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `axum::extract::Query` with an [`AppError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
