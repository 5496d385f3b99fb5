//! Server-rendered HTML pages
//!
//! Plain `format!` templates. Every piece of user or database text goes
//! through [`escape`] before it is interpolated.

use std::collections::HashSet;
use std::fmt::Write as _;

use markshelf_core::{Bookmark, BookmarkDraft, Paginated};

use crate::session::Flash;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 56rem; margin: 0 auto; padding: 1rem; color: #1f2937; }
.header { background: linear-gradient(90deg, #4f46e5, #7c3aed); color: #fff; padding: 1rem 1.5rem; border-radius: 0.5rem; }
.header h1 { margin: 0; font-size: 1.6rem; }
nav { margin: 1rem 0; display: flex; gap: 1rem; align-items: center; }
nav .who { margin-left: auto; color: #6b7280; font-size: 0.9rem; }
.flash { padding: 0.6rem 1rem; border-radius: 0.4rem; margin-bottom: 1rem; }
.flash.success { background: #dcfce7; color: #166534; }
.flash.error { background: #fee2e2; color: #991b1b; }
.bookmark-card { border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 0.8rem 1rem; margin-bottom: 0.8rem; }
.bookmark-card .meta { color: #6b7280; font-size: 0.8rem; }
.bookmark-card .description { white-space: pre-wrap; margin: 0.4rem 0; }
.actions { display: flex; gap: 0.5rem; }
.actions form { display: inline; }
.tag-pill { display: inline-block; background: #eef2ff; color: #3730a3; border-radius: 999px; padding: 0.1rem 0.6rem; margin-right: 0.3rem; font-size: 0.8rem; }
label { display: block; margin-top: 0.6rem; }
input[type=text], input[type=email], input[type=password], textarea { width: 100%; box-sizing: border-box; padding: 0.4rem; }
"#;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_html(flash: Option<&Flash>) -> String {
    flash
        .map(|f| format!(r#"<div class="flash success">{}</div>"#, escape(&f.message)))
        .unwrap_or_default()
}

/// Wrap a page body in the shared document shell.
///
/// Navigation is only shown to a logged-in user.
fn layout(title: &str, user: Option<&str>, flash: Option<&Flash>, body: &str) -> String {
    let nav = match user {
        Some(email) => format!(
            r#"<nav><a href="/bookmarks/new">Add Bookmark</a><a href="/bookmarks">View Bookmarks</a><span class="who">{}</span></nav>"#,
            escape(email)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="header"><h1>&#128209; Bookmark Manager</h1></div>
{nav}
{flash}
{body}
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        flash = flash_html(flash),
    )
}

/// Login form, optionally with an error line and the email pre-filled.
pub fn login_page(error: Option<&str>, email: &str) -> String {
    let error = error
        .map(|e| format!(r#"<div class="flash error">{}</div>"#, escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<h2>Login</h2>
{error}
<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<p><button type="submit">Login</button></p>
</form>"#,
        email = escape(email),
    );
    layout("Login", None, None, &body)
}

/// Add-bookmark form, pre-filled from `draft` (empty on first display)
pub fn add_page(email: &str, draft: &BookmarkDraft, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h2>Add New Bookmark</h2>
<form method="post" action="/bookmarks">
<label>Title <input type="text" name="title" value="{title}"></label>
<label>URL <input type="text" name="url" value="{url}"></label>
<label>Description <textarea name="description" rows="4">{description}</textarea></label>
<label>Tags (comma-separated) <input type="text" name="tags" value="{tags}"></label>
<p><button type="submit">Add Bookmark</button></p>
</form>"#,
        title = escape(&draft.title),
        url = escape(&draft.url),
        description = escape(&draft.description),
        tags = escape(&draft.tags),
    );
    layout("Add Bookmark", Some(email), flash, &body)
}

/// Inputs for the bookmark list page
pub struct ListView<'a> {
    pub email: &'a str,
    pub search: &'a str,
    pub page: &'a Paginated<Bookmark>,
    pub editing: &'a HashSet<i64>,
    pub flash: Option<&'a Flash>,
}

/// Search bar, current page of bookmarks, and page selector
pub fn list_page(view: &ListView<'_>) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<h2>Your Bookmarks</h2>
<div class="actions">
<form method="get" action="/bookmarks"><input type="text" name="q" value="{}" placeholder="Search by tag"> <button type="submit">Search</button></form>
<form method="post" action="/bookmarks/search/clear"><button type="submit">Clear Search</button></form>
</div>
"#,
        escape(view.search)
    );

    if view.page.items.is_empty() {
        body.push_str("<p>No bookmarks found.</p>\n");
    } else {
        for bookmark in &view.page.items {
            if view.editing.contains(&bookmark.id) {
                body.push_str(&edit_card(bookmark));
            } else {
                body.push_str(&bookmark_card(bookmark));
            }
        }
    }

    let total_pages = view.page.total_pages();
    if total_pages > 1 {
        let page = view.page.page;
        body.push_str(r#"<div class="actions">"#);
        if view.page.has_prev() {
            let _ = write!(body, r#"<a href="/bookmarks?page={}">Previous</a>"#, page - 1);
        }
        let _ = write!(
            body,
            r#"<form method="get" action="/bookmarks">
<label>Page <input type="number" name="page" min="1" max="{total_pages}" value="{page}"></label>
<button type="submit">Go</button>
</form>"#
        );
        if view.page.has_next() {
            let _ = write!(body, r#"<a href="/bookmarks?page={}">Next</a>"#, page + 1);
        }
        let _ = writeln!(body, "</div>\n<p>Page {} of {}</p>", page, total_pages);
    }

    layout("Bookmarks", Some(view.email), view.flash, &body)
}

fn bookmark_card(bookmark: &Bookmark) -> String {
    let mut card = String::new();
    let id = bookmark.id;

    let _ = write!(
        card,
        r#"<div class="bookmark-card">
<h3><a href="{url}" target="_blank" rel="noopener noreferrer">{title}</a></h3>
"#,
        url = escape(&bookmark.url),
        title = escape(&bookmark.title),
    );

    if let Some(preview) = bookmark.description_preview() {
        let _ = writeln!(card, r#"<div class="description">{}</div>"#, escape(&preview));
    }

    let tags = bookmark.tag_list();
    if !tags.is_empty() {
        card.push_str("<div>");
        for tag in tags {
            let _ = write!(card, r#"<span class="tag-pill">{}</span>"#, escape(tag));
        }
        card.push_str("</div>\n");
    }

    let _ = write!(
        card,
        r#"<div class="meta">Added {created}</div>
<div class="actions">
<form method="post" action="/bookmarks/{id}/edit"><button type="submit">Edit</button></form>
<form method="post" action="/bookmarks/{id}/delete"><button type="submit">Delete</button></form>
</div>
</div>
"#,
        created = bookmark.created_display(),
    );
    card
}

fn edit_card(bookmark: &Bookmark) -> String {
    format!(
        r#"<div class="bookmark-card">
<form method="post" action="/bookmarks/{id}">
<label>Title <input type="text" name="title" value="{title}"></label>
<label>URL <input type="text" name="url" value="{url}"></label>
<label>Description <textarea name="description" rows="4">{description}</textarea></label>
<label>Tags <input type="text" name="tags" value="{tags}"></label>
<div class="actions">
<button type="submit">Save</button>
<button type="submit" formaction="/bookmarks/{id}/cancel">Cancel</button>
</div>
</form>
</div>
"#,
        id = bookmark.id,
        title = escape(&bookmark.title),
        url = escape(&bookmark.url),
        description = escape(bookmark.description.as_deref().unwrap_or_default()),
        tags = escape(bookmark.tags.as_deref().unwrap_or_default()),
    )
}

/// Page shown when a database call fails
pub fn error_page(user: Option<&str>, message: &str) -> String {
    let body = format!(
        r#"<div class="flash error">{}</div>
<p><a href="/bookmarks">Back to bookmarks</a></p>"#,
        escape(message)
    );
    layout("Error", user, None, &body)
}
