//! Per-session login state machine
//!
//! `Anonymous --(valid credentials)--> Authenticated { email }`
//!
//! There is no way back: no logout and no expiry.

use super::credentials::CredentialVerifier;

/// Login failure, shown to the user and recoverable by retrying
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials. Access denied.")]
    InvalidCredentials,
}

/// Access state of one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Anonymous,
    Authenticated { email: String },
}

impl AccessState {
    /// Attempt a login.
    ///
    /// On success the state becomes `Authenticated` with the submitted email.
    /// On failure it stays `Anonymous`. An already authenticated session is
    /// left unchanged and keeps its email.
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        email: &str,
        password: &str,
    ) -> Result<&str, AuthError> {
        if let Self::Anonymous = self {
            if !verifier.verify(email, password) {
                tracing::warn!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            tracing::info!(email, "login accepted");
            *self = Self::Authenticated {
                email: email.to_owned(),
            };
        }

        match self {
            Self::Authenticated { email } => Ok(email.as_str()),
            Self::Anonymous => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Email of the logged-in user, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Authenticated { email } => Some(email),
            Self::Anonymous => None,
        }
    }
}
