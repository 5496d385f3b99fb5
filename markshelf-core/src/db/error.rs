//! Database error type

/// Errors from the pipeline client and the repositories built on it
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Transport failure or undecodable response body
    #[error("database request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-200 reply, carried verbatim
    #[error("Turso error: {status} {body}")]
    Status { status: u16, body: String },

    /// A row did not have the expected shape
    #[error("unexpected row shape: {reason}")]
    Decode { reason: String },
}

impl DbError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}
