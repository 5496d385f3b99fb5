//! Bookmark rows and drafts

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::ValidationError;

/// Lines of description shown in list previews
const PREVIEW_LINES: usize = 3;

/// A bookmark as stored in the `bookmarks` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Bookmark {
    /// Tags split on commas, trimmed, empties dropped.
    ///
    /// Trimming only happens here; the stored string is kept as typed.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First three lines of the description, with ` ...` appended when cut.
    pub fn description_preview(&self) -> Option<String> {
        let description = self.description.as_deref().filter(|d| !d.is_empty())?;
        let lines: Vec<&str> = description.lines().collect();
        let mut preview = lines
            .iter()
            .take(PREVIEW_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        if lines.len() > PREVIEW_LINES {
            preview.push_str(" ...");
        }
        Some(preview)
    }

    /// Creation time formatted for display (minute precision).
    pub fn created_display(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Prefix a scheme-less URL with `https://`.
///
/// Surrounding whitespace is trimmed first. Empty input stays empty and
/// anything already starting with `http://` or `https://` is kept as is.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https://{}", url)
    }
}

/// User-submitted bookmark fields, written together on insert and update
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct BookmarkDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
}

impl BookmarkDraft {
    /// Build a draft with its URL normalized.
    pub fn new(
        title: impl Into<String>,
        url: &str,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: normalize_url(url),
            description: description.into(),
            tags: tags.into(),
        }
    }

    /// Re-apply URL normalization (for drafts deserialized from a form).
    pub fn normalized(mut self) -> Self {
        self.url = normalize_url(&self.url);
        self
    }

    /// Title and URL must both be present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if self.url.is_empty() {
            return Err(ValidationError::Empty { field: "url" });
        }
        Ok(())
    }
}
