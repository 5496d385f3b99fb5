//! Environment configuration
//!
//! Environment variables:
//!   TURSO_DB_URL            # database base URL (libsql:// or https://), required
//!   TURSO_DB_AUTH_TOKEN     # bearer token, required
//!   USER1_CRED..USER3_CRED  # email:password pairs, at least one required
//!   MARKSHELF_MULTI_USER    # true|false (default true)
//!   MARKSHELF_DELETE_SCOPE  # global|owner (default global)

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::access::Credential;

/// Number of `USERn_CRED` slots read from the environment
pub const MAX_CREDENTIALS: usize = 3;

/// Configuration errors, all fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment variables")]
    MissingVar(&'static str),

    #[error("no user credentials set in environment variables (USER1_CRED..USER3_CRED as email:password)")]
    NoCredentials,

    #[error("invalid value '{value}' for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Whether delete is restricted to the caller's own rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteScope {
    /// Delete by id alone, regardless of owner
    #[default]
    Global,
    /// Delete by id and owner
    Owner,
}

impl FromStr for DeleteScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "owner" => Ok(Self::Owner),
            _ => Err(()),
        }
    }
}

/// Remote database location and token
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Process-wide configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ShelfConfig {
    pub database: DatabaseConfig,
    pub credentials: Vec<Credential>,
    pub multi_user: bool,
    pub delete_scope: DeleteScope,
}

impl ShelfConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (empty values count as unset).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            url: get("TURSO_DB_URL").ok_or(ConfigError::MissingVar("TURSO_DB_URL"))?,
            auth_token: get("TURSO_DB_AUTH_TOKEN")
                .ok_or(ConfigError::MissingVar("TURSO_DB_AUTH_TOKEN"))?,
        };

        let credentials: Vec<Credential> = (1..=MAX_CREDENTIALS)
            .filter_map(|i| get(&format!("USER{}_CRED", i)))
            .filter_map(|raw| Credential::parse(&raw))
            .collect();
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        let multi_user = match get("MARKSHELF_MULTI_USER") {
            None => true,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue {
                var: "MARKSHELF_MULTI_USER",
                value: v,
                expected: "true or false",
            })?,
        };

        let delete_scope = match get("MARKSHELF_DELETE_SCOPE") {
            None => DeleteScope::default(),
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                var: "MARKSHELF_DELETE_SCOPE",
                value: v,
                expected: "global or owner",
            })?,
        };

        debug!(
            credentials = credentials.len(),
            multi_user,
            delete_scope = ?delete_scope,
            "configuration loaded"
        );

        Ok(Self {
            database,
            credentials,
            multi_user,
            delete_scope,
        })
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load environment variables from .env files in multiple locations
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.markshelf/.env
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy doesn't overwrite existing vars
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from ~/.markshelf: {}", env_file.display());
                    loaded_from.push(env_file.display().to_string());
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        info!("Using environment variables only (no .env file found)");
    } else {
        info!("Loaded configuration from: {}", loaded_from.join(", "));
    }
}

/// Get the markshelf config directory path (~/.markshelf)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".markshelf"))
}
