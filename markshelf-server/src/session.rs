//! Per-browser UI state
//!
//! Each browser gets a random session id (cookie) that keys an entry in an
//! in-process map. Only sessions whose state moved away from the default are
//! kept. Nothing is persisted; restarting the server logs everyone out.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use markshelf_core::AccessState;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque session identifier carried in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One-shot confirmation shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything the UI remembers between requests for one browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub access: AccessState,
    pub search: String,
    /// 1-based; clamped against the result count on every render
    pub page: u32,
    pub editing: HashSet<i64>,
    pub flash: Option<Flash>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            access: AccessState::default(),
            search: String::new(),
            page: 1,
            editing: HashSet::new(),
            flash: None,
        }
    }
}

impl SessionState {
    /// Set the search text. A changed search starts again from page 1.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.page = 1;
    }

    pub fn start_edit(&mut self, id: i64) {
        self.editing.insert(id);
    }

    pub fn stop_edit(&mut self, id: i64) {
        self.editing.remove(&id);
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editing.contains(&id)
    }

    pub fn flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

/// Shared map of live sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the known session for `id`, or hand out a fresh id.
    ///
    /// A fresh id is not stored; the entry appears on the first
    /// [`update`](Self::update) that changes it. The flag is `true` when the
    /// caller must hand the new id back to the browser.
    pub async fn resolve(&self, id: Option<SessionId>) -> (SessionId, bool) {
        if let Some(id) = id {
            if self.inner.read().await.contains_key(&id) {
                return (id, false);
            }
        }
        (SessionId::new(), true)
    }

    /// Copy of the current state (default state for unknown ids)
    pub async fn snapshot(&self, id: SessionId) -> SessionState {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Mutate one session under the write lock.
    ///
    /// An unknown id is only stored when `f` leaves it different from the
    /// default state.
    pub async fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.inner.write().await;
        match sessions.entry(id) {
            Entry::Occupied(mut entry) => f(entry.get_mut()),
            Entry::Vacant(entry) => {
                let mut state = SessionState::default();
                let out = f(&mut state);
                if state != SessionState::default() {
                    entry.insert(state);
                    tracing::debug!(session = %id, "Session created");
                }
                out
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
