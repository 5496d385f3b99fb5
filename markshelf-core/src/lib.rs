//! markshelf-core: bookmark domain and data access
//!
//! - `db`: Turso HTTP pipeline client and the bookmark repository
//! - `access`: credential verification and the per-session login state machine
//! - `models`: bookmark rows, drafts, display helpers and pagination
//! - `config`: environment configuration

pub mod access;
pub mod config;
pub mod db;
pub mod models;

pub use access::{AccessState, AuthError, CredentialVerifier, StaticCredentials};
pub use config::{ConfigError, DatabaseConfig, DeleteScope, ShelfConfig};
pub use db::{BookmarkRepo, DbError, PipelineClient, SqlExecutor, Statement};
pub use models::{Bookmark, BookmarkDraft, Paginated, Pagination, ValidationError};
