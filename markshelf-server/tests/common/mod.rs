//! Router harness: in-memory SQLite behind `SqlExecutor`, and a tiny
//! cookie-keeping browser driving the router with `oneshot`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderName, Request, StatusCode};
use axum::Router;
use markshelf_core::access::Credential;
use markshelf_core::db::schema;
use markshelf_core::db::{ExecuteResult, Value};
use markshelf_core::{DbError, DeleteScope, SqlExecutor, Statement, StaticCredentials};
use markshelf_server::{create_router, AppState};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tower::ServiceExt;

pub const ADA: &str = "ada@example.com";
pub const ADA_PASSWORD: &str = "secret";
pub const BO: &str = "bo@example.com";
pub const BO_PASSWORD: &str = "hunter2";

/// `SqlExecutor` running statements on a local SQLite connection
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
    fail_with: Arc<Mutex<Option<(u16, String)>>>,
}

impl SqliteExecutor {
    pub fn new(multi_user: bool) -> Self {
        let db = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
            fail_with: Arc::new(Mutex::new(None)),
        };
        db.sql(schema::create_table_sql(multi_user));
        db
    }

    /// Make every following call fail like a non-200 response.
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.fail_with.lock().unwrap() = Some((status, body.to_owned()));
    }

    pub fn sql(&self, sql: &str) {
        self.conn.lock().unwrap().execute_batch(sql).unwrap();
    }

    /// Insert a row directly; `owner` is `None` for the single-user table.
    pub fn insert(&self, title: &str, url: &str, tags: &str, owner: Option<&str>) -> i64 {
        let conn = self.conn.lock().unwrap();
        match owner {
            Some(owner) => conn.execute(
                "INSERT INTO bookmarks (title, url, description, tags, user_email) VALUES (?1, ?2, '', ?3, ?4)",
                [title, url, tags, owner],
            ),
            None => conn.execute(
                "INSERT INTO bookmarks (title, url, description, tags) VALUES (?1, ?2, '', ?3)",
                [title, url, tags],
            ),
        }
        .unwrap();
        conn.last_insert_rowid()
    }

    /// Give every row a distinct `created_at`, later ids being newer.
    pub fn spread_timestamps(&self) {
        self.sql(
            "UPDATE bookmarks SET created_at = datetime('2024-01-01 00:00:00', '+' || id || ' minutes')",
        );
    }

    pub fn count(&self) -> i64 {
        self.conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
            .unwrap()
    }

    pub fn column_of(&self, id: i64, column: &str) -> Option<String> {
        self.conn
            .lock()
            .unwrap()
            .query_row(
                &format!("SELECT {} FROM bookmarks WHERE id = ?1", column),
                [id],
                |row| row.get(0),
            )
            .ok()
    }

    fn run(&self, stmt: &Statement) -> Result<Option<ExecuteResult>, DbError> {
        if let Some((status, body)) = self.fail_with.lock().unwrap().clone() {
            return Err(DbError::Status { status, body });
        }
        let conn = self.conn.lock().unwrap();
        // A failing statement comes back as an error entry, i.e. no result
        Ok(run_statement(&conn, stmt).ok())
    }
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
    async fn execute(&self, stmt: Statement) -> Result<Option<ExecuteResult>, DbError> {
        self.run(&stmt)
    }
}

fn run_statement(conn: &Connection, stmt: &Statement) -> rusqlite::Result<ExecuteResult> {
    let mut prepared = conn.prepare(&stmt.sql)?;
    for (i, arg) in stmt.args.iter().enumerate() {
        prepared.raw_bind_parameter(i + 1, arg.as_text())?;
    }

    let width = prepared.column_count();
    if width == 0 {
        let affected = prepared.raw_execute()?;
        return Ok(ExecuteResult {
            affected_row_count: affected as u64,
            last_insert_rowid: Some(conn.last_insert_rowid().to_string()),
            ..Default::default()
        });
    }

    let mut rows = Vec::new();
    let mut query = prepared.raw_query();
    while let Some(row) = query.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(match row.get_ref(i)? {
                ValueRef::Null => Value::Null,
                ValueRef::Integer(n) => Value::Integer {
                    value: n.to_string(),
                },
                ValueRef::Real(f) => Value::Float { value: f },
                ValueRef::Text(t) | ValueRef::Blob(t) => {
                    Value::text(String::from_utf8_lossy(t).into_owned())
                }
            });
        }
        rows.push(cells);
    }

    Ok(ExecuteResult {
        rows,
        ..Default::default()
    })
}

/// Router plus direct handle on its database
pub struct TestApp {
    pub router: Router,
    pub db: SqliteExecutor,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(true, DeleteScope::Global)
    }

    pub fn with_options(multi_user: bool, delete_scope: DeleteScope) -> Self {
        let db = SqliteExecutor::new(multi_user);
        let credentials = StaticCredentials::new(vec![
            Credential::new(ADA, ADA_PASSWORD),
            Credential::new(BO, BO_PASSWORD),
        ]);
        let state = AppState::new(Arc::new(db.clone()), Arc::new(credentials))
            .with_multi_user(multi_user)
            .with_delete_scope(delete_scope);

        Self {
            router: create_router(state),
            db,
        }
    }

    /// Fresh browser with no cookies.
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Browser whose session has logged in as `email`.
    pub async fn logged_in(&self, email: &str, password: &str) -> Browser {
        let mut browser = self.browser();
        let page = browser
            .post("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(page.location.as_deref(), Some("/bookmarks"), "login failed");
        browser
    }
}

/// Response reduced to what the tests look at
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl Page {
    /// Number of rendered bookmark cards (view or edit).
    pub fn cards(&self) -> usize {
        self.body.matches(r#"class="bookmark-card""#).count()
    }

    /// Whether a bookmark link with exactly this title is shown.
    pub fn shows_title(&self, title: &str) -> bool {
        self.body.contains(&format!(">{}</a>", title))
    }
}

/// Cookie-keeping client for the router
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, uri: &str) -> Page {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Page {
        let request = self
            .request("POST", uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(form)))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Page {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let location = header(LOCATION);
        let set_cookie = header(SET_COOKIE);
        if let Some(cookie) = &set_cookie {
            // Keep only `name=value`
            self.cookie = cookie.split(';').next().map(str::to_owned);
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Page {
            status,
            location,
            set_cookie,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(raw: &str) -> String {
    let mut out = String::new();
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
