//! Fake Turso pipeline endpoint backed by an in-memory SQLite database.
//!
//! Speaks just enough of `/v2/pipeline` for the client: execute + close,
//! text args, Hrana-typed cells, error entries for failing statements.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use markshelf_core::db::schema;
use markshelf_core::PipelineClient;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

/// One request as the fake saw it
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    conn: Arc<Mutex<Connection>>,
    requests: Arc<Mutex<Vec<Captured>>>,
    fail_with: Arc<Mutex<Option<(u16, String)>>>,
}

pub struct FakeTurso {
    pub base_url: String,
    state: FakeState,
}

impl FakeTurso {
    /// Fake with the `bookmarks` table already created.
    pub async fn start(multi_user: bool) -> Self {
        let fake = Self::start_empty().await;
        fake.sql(schema::create_table_sql(multi_user));
        fake
    }

    /// Fake with an empty database.
    pub async fn start_empty() -> Self {
        let state = FakeState {
            conn: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/v2/pipeline", post(pipeline))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> PipelineClient {
        PipelineClient::new(&self.base_url, TOKEN)
    }

    /// Answer every following request with this status and body.
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.state.fail_with.lock().unwrap() = Some((status, body.to_owned()));
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Run SQL directly against the backing database.
    pub fn sql(&self, sql: &str) {
        self.state.conn.lock().unwrap().execute_batch(sql).unwrap();
    }

    /// Give every row a distinct `created_at`, later ids being newer.
    pub fn spread_timestamps(&self) {
        self.sql(
            "UPDATE bookmarks SET created_at = datetime('2024-01-01 00:00:00', '+' || id || ' minutes')",
        );
    }

    pub fn count(&self) -> i64 {
        self.state
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
            .unwrap()
    }

    pub fn url_of(&self, id: i64) -> Option<String> {
        self.state
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT url FROM bookmarks WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .ok()
    }
}

async fn pipeline(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    handle(&state, &headers, body)
}

fn handle(state: &FakeState, headers: &HeaderMap, body: Value) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.requests.lock().unwrap().push(Captured {
        authorization: authorization.clone(),
        body: body.clone(),
    });

    if let Some((status, text)) = state.fail_with.lock().unwrap().clone() {
        return (StatusCode::from_u16(status).unwrap(), text).into_response();
    }
    let expected = format!("Bearer {}", TOKEN);
    if authorization.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#).into_response();
    }

    let conn = state.conn.lock().unwrap();
    let results: Vec<Value> = body["requests"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|req| match req["type"].as_str() {
            Some("execute") => match execute(&conn, &req["stmt"]) {
                Ok(result) => json!({"type": "ok", "response": {"type": "execute", "result": result}}),
                Err(e) => json!({"type": "error", "error": {"message": e.to_string(), "code": "SQLITE_ERROR"}}),
            },
            Some("close") => json!({"type": "ok", "response": {"type": "close"}}),
            other => json!({"type": "error", "error": {"message": format!("unknown request {:?}", other)}}),
        })
        .collect();

    Json(json!({"baton": null, "base_url": null, "results": results})).into_response()
}

fn execute(conn: &Connection, stmt: &Value) -> rusqlite::Result<Value> {
    let sql = stmt["sql"].as_str().unwrap_or_default();
    let mut prepared = conn.prepare(sql)?;

    for (i, arg) in stmt["args"].as_array().into_iter().flatten().enumerate() {
        prepared.raw_bind_parameter(i + 1, arg["value"].as_str().unwrap_or_default())?;
    }
    for named in stmt["named_args"].as_array().into_iter().flatten() {
        let name = named["name"].as_str().unwrap_or_default();
        let name = if name.starts_with([':', '@', '$']) {
            name.to_owned()
        } else {
            format!(":{}", name)
        };
        if let Some(index) = prepared.parameter_index(&name)? {
            prepared.raw_bind_parameter(index, named["value"]["value"].as_str().unwrap_or_default())?;
        }
    }

    let cols: Vec<Value> = prepared
        .column_names()
        .into_iter()
        .map(|name| json!({"name": name, "decltype": null}))
        .collect();

    if cols.is_empty() {
        let affected = prepared.raw_execute()?;
        return Ok(json!({
            "cols": [],
            "rows": [],
            "affected_row_count": affected,
            "last_insert_rowid": conn.last_insert_rowid().to_string(),
        }));
    }

    let width = cols.len();
    let mut rows = Vec::new();
    let mut query = prepared.raw_query();
    while let Some(row) = query.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(match row.get_ref(i)? {
                ValueRef::Null => json!({"type": "null"}),
                ValueRef::Integer(n) => json!({"type": "integer", "value": n.to_string()}),
                ValueRef::Real(f) => json!({"type": "float", "value": f}),
                ValueRef::Text(t) => {
                    json!({"type": "text", "value": String::from_utf8_lossy(t)})
                }
                ValueRef::Blob(b) => json!({"type": "blob", "base64": BASE64.encode(b)}),
            });
        }
        rows.push(Value::Array(cells));
    }

    Ok(json!({
        "cols": cols,
        "rows": rows,
        "affected_row_count": 0,
        "last_insert_rowid": null,
    }))
}
