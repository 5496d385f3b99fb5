//! Login form

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::http::extractors::CurrentSession;
use crate::http::server::AppState;
use crate::views;

/// Submitted login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login - show the form, or skip it when already logged in
async fn login_form(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Response {
    if state.sessions.snapshot(session).await.access.is_authenticated() {
        return Redirect::to("/bookmarks").into_response();
    }
    Html(views::login_page(None, "")).into_response()
}

/// POST /login - verify credentials against the configured logins
async fn login(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let verifier = state.verifier.as_ref();
    let outcome = state
        .sessions
        .update(session, |s| {
            s.access
                .login(verifier, &form.email, &form.password)
                .map(str::to_owned)
        })
        .await;

    match outcome {
        Ok(email) => {
            tracing::debug!(%session, email = %email, "Session authenticated");
            Redirect::to("/bookmarks").into_response()
        }
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some(&e.to_string()), &form.email)),
        )
            .into_response(),
    }
}

/// Login routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/login", get(login_form).post(login))
}
