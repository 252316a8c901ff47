use serde::Serialize;

/// Pagination arithmetic for one request.
///
/// `total_pages` is never below 1, so an empty result still has a page to
/// render. Pages past the end are allowed and simply hold no items.
///
/// ```rust
/// use potluck::domain::PageWindow;
///
/// let window = PageWindow::new(25, 2, 12);
/// assert_eq!(window.total_pages, 3);
/// assert_eq!(window.offset(), 12);
/// assert_eq!(window.prev_page(), Some(1));
/// assert_eq!(window.next_page(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PageWindow {
    /// `page` below 1 is treated as 1 and `page_size` below 1 as 1.
    #[must_use]
    pub fn new(total_count: u64, page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);

        Self {
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Whether this page can hold any rows at all.
    #[must_use]
    pub const fn is_in_range(&self) -> bool {
        self.offset() < self.total_count
    }

    #[must_use]
    pub const fn prev_page(&self) -> Option<u64> {
        if self.page > 1 {
            Some(self.page - 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn next_page(&self) -> Option<u64> {
        if self.page < self.total_pages {
            Some(self.page + 1)
        } else {
            None
        }
    }

    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            prev_page: self.prev_page(),
            next_page: self.next_page(),
        }
    }
}

/// One page of an ordered result set plus navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}
