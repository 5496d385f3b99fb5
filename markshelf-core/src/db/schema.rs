//! The single `bookmarks` table

use super::client::SqlExecutor;
use super::error::DbError;
use super::protocol::Statement;

/// Table for the multi-user variant (rows owned by `user_email`)
pub const CREATE_BOOKMARKS_MULTI_USER: &str = r#"
CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    tags TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    user_email TEXT
)
"#;

/// Table for the single-user variant
pub const CREATE_BOOKMARKS_SINGLE_USER: &str = r#"
CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    tags TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub fn create_table_sql(multi_user: bool) -> &'static str {
    if multi_user {
        CREATE_BOOKMARKS_MULTI_USER
    } else {
        CREATE_BOOKMARKS_SINGLE_USER
    }
}

/// Create the `bookmarks` table if it is missing.
pub async fn ensure_schema(db: &dyn SqlExecutor, multi_user: bool) -> Result<(), DbError> {
    db.execute(Statement::new(create_table_sql(multi_user).trim()))
        .await?;
    tracing::info!(multi_user, "bookmarks table ready");
    Ok(())
}

/// Round-trip `SELECT 1`; `Ok(true)` when the database answered with a row.
pub async fn ping(db: &dyn SqlExecutor) -> Result<bool, DbError> {
    let result = db.execute(Statement::new("SELECT 1")).await?;
    Ok(result.is_some_and(|r| !r.rows.is_empty()))
}
