//! Page-level error type with IntoResponse
//!
//! Errors render as HTML pages, except a missing login which redirects to
//! the login form.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use markshelf_core::{DbError, ValidationError};

use crate::views;

/// Error returned by page handlers
#[derive(Debug)]
pub enum AppError {
    /// No authenticated session (redirect to /login)
    Unauthenticated,

    /// Malformed request input (400)
    Validation(ValidationError),

    /// Remote database call failed (502, message shown verbatim)
    Database(DbError),

    /// Internal error (500)
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated => return Redirect::to("/login").into_response(),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        (status, Html(views::error_page(None, &message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}
