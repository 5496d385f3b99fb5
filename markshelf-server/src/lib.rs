//! markshelf-server: web UI for the bookmark shelf
//!
//! Server-rendered pages for logging in, adding, listing, searching,
//! editing and deleting bookmarks. Per-browser UI state lives in
//! [`session::SessionStore`].

pub mod http;
pub mod session;
pub mod views;

pub use http::{create_router, run_server, AppError, AppState, ServerConfig, ServerError};
pub use session::{Flash, SessionId, SessionState, SessionStore};
