//! Turso HTTP pipeline wire format (`POST /v2/pipeline`)
//!
//! Request:  {"requests":[{"type":"execute","stmt":{...}},{"type":"close"}]}
//! Response: {"results":[{"type":"ok","response":{"type":"execute","result":{...}}}, ...]}

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// A SQL statement with `?` placeholders and text-typed arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub sql: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub named_args: Vec<NamedArg>,
}

impl Statement {
    /// Statement without arguments.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
            named_args: Vec::new(),
        }
    }

    /// Statement with positional arguments, each sent as text.
    pub fn with_args<I, S>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut stmt = Self::new(sql);
        stmt.args = args.into_iter().map(|a| Value::text(a.to_string())).collect();
        stmt
    }

    /// Add a named argument (`:name` / `@name` / `$name` in the SQL), sent as text.
    pub fn bind_named(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.named_args.push(NamedArg {
            name: name.into(),
            value: Value::text(value.to_string()),
        });
        self
    }
}

/// Named statement argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedArg {
    pub name: String,
    pub value: Value,
}

/// A cell or argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Value {
    Null,
    /// 64-bit integer, carried as a decimal string on the wire
    Integer { value: String },
    Float { value: f64 },
    Text { value: String },
    Blob { base64: String },
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view: integer cells, whole floats, and numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer { value } | Self::Text { value } => value.trim().parse().ok(),
            Self::Float { value } if value.fract() == 0.0 => Some(*value as i64),
            _ => None,
        }
    }

    /// Text view of any non-null scalar. Blobs are decoded as UTF-8 when possible.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer { value } | Self::Text { value } => Some(value.clone()),
            Self::Float { value } => Some(value.to_string()),
            Self::Blob { base64 } => BASE64
                .decode(base64)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok()),
        }
    }

    /// Raw bytes of a blob cell.
    pub fn as_blob(&self) -> Option<Vec<u8>> {
        match self {
            Self::Blob { base64 } => BASE64.decode(base64).ok(),
            _ => None,
        }
    }
}

/// One result row
pub type Row = Vec<Value>;

/// Pipeline request body
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baton: Option<String>,
    pub requests: Vec<StreamRequest>,
}

impl PipelineRequest {
    /// Execute one statement and close the stream in the same call.
    pub fn execute_and_close(stmt: Statement) -> Self {
        Self {
            baton: None,
            requests: vec![StreamRequest::Execute { stmt }, StreamRequest::Close],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamRequest {
    Execute { stmt: Statement },
    Close,
}

/// Pipeline response body
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineResponse {
    #[serde(default)]
    pub baton: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub results: Vec<StreamResult>,
}

impl PipelineResponse {
    /// First `ok` result carrying an `execute` response.
    ///
    /// Error entries are logged and skipped.
    pub fn into_first_execute(self) -> Option<ExecuteResult> {
        for result in self.results {
            match result {
                StreamResult::Ok {
                    response: StreamResponse::Execute { result },
                } => return Some(result),
                StreamResult::Error { error } => {
                    tracing::warn!(
                        code = error.code.as_deref().unwrap_or("-"),
                        "pipeline statement failed: {}",
                        error.message
                    );
                }
                StreamResult::Ok { .. } => {}
            }
        }
        None
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: StreamError },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamResponse {
    Execute { result: ExecuteResult },
    Close,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Rows and metadata for one executed statement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecuteResult {
    #[serde(default)]
    pub cols: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub affected_row_count: u64,
    #[serde(default)]
    pub last_insert_rowid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decltype: Option<String>,
}
