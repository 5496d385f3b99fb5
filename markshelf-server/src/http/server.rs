//! Axum server setup
//!
//! Server skeleton with:
//! - Cookie-keyed sessions on every page route
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use markshelf_core::{
    BookmarkRepo, CredentialVerifier, DeleteScope, PipelineClient, ShelfConfig, SqlExecutor,
    StaticCredentials,
};

use super::{routes, session_layer};
use crate::session::SessionStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8501)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn SqlExecutor>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: SessionStore,
    /// Rows carry a `user_email` owner column
    pub multi_user: bool,
    pub delete_scope: DeleteScope,
}

impl AppState {
    pub fn new(db: Arc<dyn SqlExecutor>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            db,
            verifier,
            sessions: SessionStore::new(),
            multi_user: true,
            delete_scope: DeleteScope::default(),
        }
    }

    /// State backed by the Turso pipeline client and the configured logins.
    pub fn from_config(config: &ShelfConfig) -> Self {
        let client = PipelineClient::from_config(&config.database);
        tracing::info!(endpoint = client.endpoint(), "Database client ready");

        let credentials = StaticCredentials::new(config.credentials.clone());
        tracing::info!(users = credentials.len(), "Credentials loaded");

        Self::new(Arc::new(client), Arc::new(credentials))
            .with_multi_user(config.multi_user)
            .with_delete_scope(config.delete_scope)
    }

    pub fn with_multi_user(mut self, multi_user: bool) -> Self {
        self.multi_user = multi_user;
        self
    }

    pub fn with_delete_scope(mut self, scope: DeleteScope) -> Self {
        self.delete_scope = scope;
        self
    }

    pub fn repo(&self) -> BookmarkRepo<'_> {
        BookmarkRepo::new(self.db.as_ref()).with_delete_scope(self.delete_scope)
    }

    /// Owner filter for repository calls: the email in multi-user mode.
    pub fn owner<'a>(&self, email: &'a str) -> Option<&'a str> {
        self.multi_user.then_some(email)
    }
}

/// Build the application router.
///
/// `/health` sits outside the session layer so probes do not create sessions.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let pages = Router::new()
        .route("/", get(|| async { Redirect::to("/bookmarks") }))
        .merge(routes::auth::router())
        .merge(routes::bookmarks::router())
        .layer(middleware::from_fn_with_state(state.clone(), session_layer));

    Router::new()
        .merge(routes::health::router())
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let config = ShelfConfig::from_env()?;
/// run_server(AppState::from_config(&config), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = create_router(state);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
