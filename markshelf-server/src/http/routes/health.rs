//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use markshelf_core::db::schema;

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub sessions: usize,
}

/// Result of a `SELECT 1` round trip
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = match schema::ping(state.db.as_ref()).await {
        Ok(true) => DatabaseHealth {
            reachable: true,
            error: None,
        },
        Ok(false) => DatabaseHealth {
            reachable: false,
            error: Some("no result for SELECT 1".into()),
        },
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            DatabaseHealth {
                reachable: false,
                error: Some(e.to_string()),
            }
        }
    };

    let (status, label) = if database.reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            database,
            sessions: state.sessions.len().await,
        }),
    )
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
