//! Bookmark pages: list, search, add, edit, delete
//!
//! Every route needs a logged-in session (see [`CurrentUser`]). Mutating
//! actions redirect back to a GET page and leave a flash message in the
//! session.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use markshelf_core::{BookmarkDraft, Paginated, Pagination};

use crate::http::error::AppError;
use crate::http::extractors::{BookmarkId, CurrentUser};
use crate::http::server::AppState;
use crate::session::Flash;
use crate::views::{self, ListView};

/// Query string of the list page
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Tag substring to search for
    pub q: Option<String>,
    /// Requested page as typed; see [`ListParams::page`]
    pub page: Option<String>,
}

impl ListParams {
    /// Requested page number. Values that are not a number are ignored and
    /// the session keeps its current page; numbers are clamped on render.
    pub fn page(&self) -> Option<u32> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

/// GET /bookmarks - current page of the (optionally filtered) list
async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let requested_page = params.page();
    let (search, requested) = state
        .sessions
        .update(user.session, |s| {
            if let Some(q) = params.q {
                s.set_search(q);
            }
            if let Some(page) = requested_page {
                s.page = page;
            }
            (s.search.clone(), s.page)
        })
        .await;

    // The whole result set is fetched and paged here
    let all = state
        .repo()
        .list(state.owner(&user.email), Some(&search))
        .await?;
    let page = Paginated::from_all(all, Pagination::new(requested));

    let (editing, flash) = state
        .sessions
        .update(user.session, |s| {
            s.page = page.page;
            (s.editing.clone(), s.take_flash())
        })
        .await;

    Ok(Html(views::list_page(&ListView {
        email: &user.email,
        search: &search,
        page: &page,
        editing: &editing,
        flash: flash.as_ref(),
    })))
}

/// POST /bookmarks/search/clear
async fn clear_search(State(state): State<Arc<AppState>>, user: CurrentUser) -> Redirect {
    state.sessions.update(user.session, |s| s.clear_search()).await;
    Redirect::to("/bookmarks")
}

/// GET /bookmarks/new - add form
async fn new_bookmark_form(State(state): State<Arc<AppState>>, user: CurrentUser) -> Html<String> {
    let flash = state.sessions.update(user.session, |s| s.take_flash()).await;
    Html(views::add_page(
        &user.email,
        &BookmarkDraft::default(),
        flash.as_ref(),
    ))
}

/// POST /bookmarks - insert a bookmark
///
/// A missing title or URL skips the insert and shows the form again with
/// the submitted values.
async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(submitted): Form<BookmarkDraft>,
) -> Result<Response, AppError> {
    let draft = submitted.clone().normalized();
    if let Err(e) = draft.validate() {
        tracing::debug!("Add skipped: {}", e);
        return Ok(Html(views::add_page(&user.email, &submitted, None)).into_response());
    }

    state
        .repo()
        .insert(&draft, state.owner(&user.email))
        .await?;
    tracing::info!(url = %draft.url, "Bookmark added");

    state
        .sessions
        .update(user.session, |s| s.flash(Flash::success("Bookmark added!")))
        .await;
    Ok(Redirect::to("/bookmarks/new").into_response())
}

/// POST /bookmarks/{id}/edit - show the edit form for one row
async fn start_edit(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    BookmarkId(id): BookmarkId,
) -> Redirect {
    state.sessions.update(user.session, |s| s.start_edit(id)).await;
    Redirect::to("/bookmarks")
}

/// POST /bookmarks/{id}/cancel - leave edit mode without writing
async fn cancel_edit(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    BookmarkId(id): BookmarkId,
) -> Redirect {
    state.sessions.update(user.session, |s| s.stop_edit(id)).await;
    Redirect::to("/bookmarks")
}

/// POST /bookmarks/{id} - overwrite every field of a row
async fn save_bookmark(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    BookmarkId(id): BookmarkId,
    Form(draft): Form<BookmarkDraft>,
) -> Result<Redirect, AppError> {
    let draft = draft.normalized();
    let affected = state
        .repo()
        .update(id, &draft, state.owner(&user.email))
        .await?;
    if affected == 0 {
        tracing::debug!(id, "Update matched no rows");
    }

    state
        .sessions
        .update(user.session, |s| {
            s.stop_edit(id);
            s.flash(Flash::success("Bookmark updated!"));
        })
        .await;
    Ok(Redirect::to("/bookmarks"))
}

/// POST /bookmarks/{id}/delete
async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    BookmarkId(id): BookmarkId,
) -> Result<Redirect, AppError> {
    let affected = state
        .repo()
        .delete(id, state.owner(&user.email))
        .await?;
    tracing::info!(id, affected, "Bookmark deleted");

    state
        .sessions
        .update(user.session, |s| {
            s.stop_edit(id);
            s.flash(Flash::success("Bookmark deleted!"));
        })
        .await;
    Ok(Redirect::to("/bookmarks"))
}

/// Bookmark routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/bookmarks/new", get(new_bookmark_form))
        .route("/bookmarks/search/clear", post(clear_search))
        .route("/bookmarks/{id}", post(save_bookmark))
        .route("/bookmarks/{id}/edit", post(start_edit))
        .route("/bookmarks/{id}/cancel", post(cancel_edit))
        .route("/bookmarks/{id}/delete", post(delete_bookmark))
}
