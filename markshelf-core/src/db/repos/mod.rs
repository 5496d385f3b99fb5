//! Repository implementations for database access
//!
//! Repositories borrow an executor and issue one statement per operation.

pub mod bookmarks;

pub use bookmarks::BookmarkRepo;
