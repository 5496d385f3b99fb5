//! Pagination over an already-fetched, ordered list
//!
//! The repository always returns the full ordered result; pages are cut here.

/// Items per page in the list view
pub const PAGE_SIZE: u32 = 10;

/// Requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl Pagination {
    /// Page of the standard size. Page is clamped to a minimum of 1.
    pub fn new(page: u32) -> Self {
        Self::with_per_page(page, PAGE_SIZE)
    }

    /// Page with an explicit size (minimum 1 item per page).
    pub fn with_per_page(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of pages needed for `total` items: `ceil(total / per_page)`.
    pub fn page_count(&self, total: usize) -> u32 {
        total.div_ceil(self.per_page as usize) as u32
    }

    /// Clamp the page into `1..=max(page_count, 1)`.
    pub fn clamp_to(self, total: usize) -> Self {
        let last = self.page_count(total).max(1);
        Self {
            page: self.page.min(last),
            per_page: self.per_page,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.per_page) as usize
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of items plus the totals needed to render page controls
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: usize,
    /// Current page number (after clamping)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// Cut one page out of the full ordered list, clamping the page first.
    pub fn from_all(all: Vec<T>, page: Pagination) -> Self {
        let total = all.len();
        let page = page.clamp_to(total);
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();

        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        }
    }

    /// Total number of pages, `ceil(total / per_page)` (0 when empty).
    pub fn total_pages(&self) -> u32 {
        Pagination::with_per_page(self.page, self.per_page).page_count(self.total)
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
