//! Credential verification

use crate::config::MAX_CREDENTIALS;

/// Capability to check an email/password pair
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// One configured `email:password` pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    email: String,
    password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Parse `email:password`, splitting on the first colon and trimming both
    /// halves. Returns `None` when there is no colon.
    pub fn parse(raw: &str) -> Option<Self> {
        let (email, password) = raw.split_once(':')?;
        Some(Self::new(email.trim(), password.trim()))
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed allow-list of plaintext pairs, compared exactly
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    entries: Vec<Credential>,
}

impl StaticCredentials {
    /// Keep at most the first three entries.
    pub fn new(mut entries: Vec<Credential>) -> Self {
        entries.truncate(MAX_CREDENTIALS);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        self.entries.iter().any(|c| c.matches(email, password))
    }
}
