//! Bookmark repository
//!
//! Each operation is exactly one statement:
//! - list: optional owner filter, optional tag substring, newest first
//! - insert/update: full-field writes, URL already normalized by the caller
//! - delete: by id, owner-scoped only under `DeleteScope::Owner`

use chrono::NaiveDateTime;

use crate::config::DeleteScope;
use crate::db::client::SqlExecutor;
use crate::db::error::DbError;
use crate::db::protocol::{Statement, Value};
use crate::models::{Bookmark, BookmarkDraft};

const SELECT_COLUMNS: &str = "SELECT id, title, url, description, tags, created_at FROM bookmarks";

/// Bookmark repository
pub struct BookmarkRepo<'a> {
    db: &'a dyn SqlExecutor,
    delete_scope: DeleteScope,
}

impl<'a> BookmarkRepo<'a> {
    pub fn new(db: &'a dyn SqlExecutor) -> Self {
        Self {
            db,
            delete_scope: DeleteScope::default(),
        }
    }

    pub fn with_delete_scope(mut self, scope: DeleteScope) -> Self {
        self.delete_scope = scope;
        self
    }

    /// All visible bookmarks, `created_at` descending.
    ///
    /// `owner` is `Some` in the multi-user variant. An empty `tag_query`
    /// is the same as none.
    pub async fn list(
        &self,
        owner: Option<&str>,
        tag_query: Option<&str>,
    ) -> Result<Vec<Bookmark>, DbError> {
        let mut clauses = Vec::new();
        let mut args = Vec::new();

        if let Some(owner) = owner {
            clauses.push("user_email = ?");
            args.push(owner.to_owned());
        }
        if let Some(query) = tag_query.filter(|q| !q.is_empty()) {
            clauses.push("tags LIKE ?");
            args.push(format!("%{}%", query));
        }

        let mut sql = SELECT_COLUMNS.to_owned();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let Some(result) = self.db.execute(Statement::with_args(sql, args)).await? else {
            return Ok(Vec::new());
        };

        result.rows.iter().map(|row| row_to_bookmark(row)).collect()
    }

    /// Insert a new bookmark owned by `owner` (multi-user) or nobody.
    pub async fn insert(&self, draft: &BookmarkDraft, owner: Option<&str>) -> Result<(), DbError> {
        let stmt = match owner {
            Some(owner) => Statement::with_args(
                "INSERT INTO bookmarks (title, url, description, tags, user_email) VALUES (?, ?, ?, ?, ?)",
                [
                    draft.title.as_str(),
                    draft.url.as_str(),
                    draft.description.as_str(),
                    draft.tags.as_str(),
                    owner,
                ],
            ),
            None => Statement::with_args(
                "INSERT INTO bookmarks (title, url, description, tags) VALUES (?, ?, ?, ?)",
                [
                    draft.title.as_str(),
                    draft.url.as_str(),
                    draft.description.as_str(),
                    draft.tags.as_str(),
                ],
            ),
        };

        let result = self.db.execute(stmt).await?;
        tracing::info!(
            rowid = result
                .as_ref()
                .and_then(|r| r.last_insert_rowid.as_deref())
                .unwrap_or("-"),
            "bookmark inserted"
        );
        Ok(())
    }

    /// Overwrite every field of bookmark `id`. Returns the affected row count.
    ///
    /// With an owner the row must also belong to that owner, so guessing
    /// another user's id updates nothing.
    pub async fn update(
        &self,
        id: i64,
        draft: &BookmarkDraft,
        owner: Option<&str>,
    ) -> Result<u64, DbError> {
        let mut sql =
            "UPDATE bookmarks SET title = ?, url = ?, description = ?, tags = ? WHERE id = ?"
                .to_owned();
        let mut args = vec![
            draft.title.clone(),
            draft.url.clone(),
            draft.description.clone(),
            draft.tags.clone(),
            id.to_string(),
        ];
        if let Some(owner) = owner {
            sql.push_str(" AND user_email = ?");
            args.push(owner.to_owned());
        }

        let affected = self
            .db
            .execute(Statement::with_args(sql, args))
            .await?
            .map_or(0, |r| r.affected_row_count);
        tracing::info!(id, affected, "bookmark updated");
        Ok(affected)
    }

    /// Delete bookmark `id`. Returns the affected row count.
    ///
    /// Under `DeleteScope::Global` the owner is ignored and any session can
    /// remove any row by id.
    pub async fn delete(&self, id: i64, owner: Option<&str>) -> Result<u64, DbError> {
        let stmt = match (self.delete_scope, owner) {
            (DeleteScope::Owner, Some(owner)) => Statement::with_args(
                "DELETE FROM bookmarks WHERE id = ? AND user_email = ?",
                [id.to_string(), owner.to_owned()],
            ),
            _ => Statement::with_args("DELETE FROM bookmarks WHERE id = ?", [id]),
        };

        let affected = self
            .db
            .execute(stmt)
            .await?
            .map_or(0, |r| r.affected_row_count);
        tracing::info!(id, affected, scope = ?self.delete_scope, "bookmark deleted");
        Ok(affected)
    }
}

/// Decode `id, title, url, description, tags, created_at`.
fn row_to_bookmark(row: &[Value]) -> Result<Bookmark, DbError> {
    let [id, title, url, description, tags, created_at] = row else {
        return Err(DbError::decode(format!(
            "expected 6 columns, got {}",
            row.len()
        )));
    };

    Ok(Bookmark {
        id: id
            .as_i64()
            .ok_or_else(|| DbError::decode("id is not an integer"))?,
        title: title
            .as_text()
            .ok_or_else(|| DbError::decode("title is null"))?,
        url: url.as_text().ok_or_else(|| DbError::decode("url is null"))?,
        description: description.as_text(),
        tags: tags.as_text(),
        created_at: parse_timestamp(created_at)?,
    })
}

/// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`), with optional
/// fractional seconds or a `T` separator.
fn parse_timestamp(value: &Value) -> Result<NaiveDateTime, DbError> {
    let text = value
        .as_text()
        .ok_or_else(|| DbError::decode("created_at is null"))?;

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
        .ok_or_else(|| DbError::decode(format!("created_at '{}' is not a timestamp", text)))
}
