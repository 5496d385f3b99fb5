//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use markshelf_core::{AccessState, ValidationError};

use super::error::AppError;
use super::server::AppState;
use crate::session::SessionId;

/// Session id placed in request extensions by the session layer
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub SessionId);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .map(Self)
            .ok_or_else(|| AppError::Internal {
                message: "session layer not installed".into(),
            })
    }
}

/// Logged-in user of the current session
///
/// Rejects anonymous sessions with a redirect to the login form.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: SessionId,
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        match state.sessions.snapshot(session).await.access {
            AccessState::Authenticated { email } => Ok(Self { session, email }),
            AccessState::Anonymous => Err(AppError::Unauthenticated),
        }
    }
}

/// Extract a bookmark id from path
pub struct BookmarkId(pub i64);

impl<S> FromRequestParts<S> for BookmarkId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<i64>().map_err(|_| {
            AppError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}
