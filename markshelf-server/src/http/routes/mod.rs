//! Route handlers organized by resource

pub mod auth;
pub mod bookmarks;
pub mod health;
