//! Domain models
//!
//! Drafts normalize user input at construction; validation is a separate
//! step so the add form can reject empty fields while edits save as typed.

pub mod bookmark;
pub mod pagination;
pub mod validation;

pub use bookmark::{normalize_url, Bookmark, BookmarkDraft};
pub use pagination::{Paginated, Pagination, PAGE_SIZE};
pub use validation::ValidationError;
