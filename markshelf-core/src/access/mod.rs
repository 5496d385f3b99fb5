//! Access control
//!
//! `CredentialVerifier` answers "is this email/password pair valid";
//! `AccessState` is the per-session login state that consults it.

pub mod credentials;
pub mod state;

pub use credentials::{Credential, CredentialVerifier, StaticCredentials};
pub use state::{AccessState, AuthError};
