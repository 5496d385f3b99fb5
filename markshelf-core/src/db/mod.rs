//! Database layer - pipeline client and repositories
//!
//! - No connection state: every statement is its own pipeline request
//! - Repositories take `&dyn SqlExecutor`, never a concrete client
//! - All arguments travel as text; SQLite column affinity does the rest

pub mod client;
pub mod error;
pub mod protocol;
pub mod repos;
pub mod schema;

pub use client::{PipelineClient, SqlExecutor};
pub use error::DbError;
pub use protocol::{ExecuteResult, Row, Statement, Value};
pub use repos::BookmarkRepo;
