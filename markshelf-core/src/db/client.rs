//! Pipeline client and the executor trait the repositories depend on
//!
//! One `execute` call is one HTTP request: the statement followed by a
//! `close`, no retries, no batching, no timeout beyond the reqwest default.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::error::DbError;
use super::protocol::{ExecuteResult, PipelineRequest, PipelineResponse, Statement};
use crate::config::DatabaseConfig;

/// Anything that can run one statement and hand back its rows (testable seam)
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run `stmt`. `Ok(None)` means the reply carried no execute result.
    async fn execute(&self, stmt: Statement) -> Result<Option<ExecuteResult>, DbError>;
}

/// Turso HTTP pipeline client
#[derive(Clone)]
pub struct PipelineClient {
    http: Client,
    endpoint: String,
    auth_token: String,
}

impl PipelineClient {
    /// Create a client for `base_url` (a `libsql://` scheme is rewritten to `https://`).
    pub fn new(base_url: &str, auth_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/v2/pipeline", http_base_url(base_url)),
            auth_token: auth_token.into(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(&config.url, config.auth_token.clone())
    }

    /// Full pipeline endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SqlExecutor for PipelineClient {
    async fn execute(&self, stmt: Statement) -> Result<Option<ExecuteResult>, DbError> {
        tracing::debug!(sql = %stmt.sql, args = stmt.args.len(), "executing statement");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.auth_token)
            .json(&PipelineRequest::execute_and_close(stmt))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "pipeline request rejected");
            return Err(DbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: PipelineResponse = response.json().await?;
        Ok(body.into_first_execute())
    }
}

/// `libsql://host` -> `https://host`, trailing slash removed.
pub fn http_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    match url.strip_prefix("libsql://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_owned(),
    }
}
