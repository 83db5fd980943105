//! Pagination control

use crate::models::PageMeta;

/// Entry of the rendered page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// Previous/next and numbered page links for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
    siblings: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current_page: current_page.clamp(1, total_pages),
            total_pages,
            siblings: 1,
        }
    }

    pub fn from_meta(meta: &PageMeta) -> Self {
        Self::new(meta.page, meta.total_pages())
    }

    /// Number of pages shown on each side of the current one
    pub fn with_siblings(mut self, siblings: u32) -> Self {
        self.siblings = siblings;
        self
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_prev_disabled(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_next_disabled(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Invoke `on_page_change` with the next page unless already on the last one
    pub fn next(&self, on_page_change: impl FnOnce(u32)) {
        if !self.is_next_disabled() {
            on_page_change(self.current_page + 1);
        }
    }

    pub fn prev(&self, on_page_change: impl FnOnce(u32)) {
        if !self.is_prev_disabled() {
            on_page_change(self.current_page - 1);
        }
    }

    /// Jump to a page; out-of-range pages and the current page are ignored
    pub fn go_to(&self, page: u32, on_page_change: impl FnOnce(u32)) {
        if page >= 1 && page <= self.total_pages && page != self.current_page {
            on_page_change(page);
        }
    }

    /// First, last, and a window around the current page, with ellipses between gaps
    pub fn items(&self) -> Vec<PageItem> {
        let first = 1;
        let last = self.total_pages;
        let start = self.current_page.saturating_sub(self.siblings).max(first);
        let end = (self.current_page + self.siblings).min(last);

        let mut numbers = vec![first];
        numbers.extend(start..=end);
        numbers.push(last);
        numbers.sort_unstable();
        numbers.dedup();

        let mut items = Vec::with_capacity(numbers.len() + 2);
        let mut previous: Option<u32> = None;
        for number in numbers {
            if let Some(prev) = previous {
                if number - prev == 2 {
                    items.push(PageItem::Page {
                        number: prev + 1,
                        active: false,
                    });
                } else if number - prev > 2 {
                    items.push(PageItem::Ellipsis);
                }
            }
            items.push(PageItem::Page {
                number,
                active: number == self.current_page,
            });
            previous = Some(number);
        }
        items
    }
}

/// "Showing 21-30 of 95" summary line
pub fn range_label(meta: &PageMeta, rows_on_page: usize) -> String {
    if meta.total == 0 || rows_on_page == 0 {
        return "No entries".to_string();
    }
    let per_page = if meta.per_page > 0 {
        meta.per_page as u64
    } else {
        rows_on_page as u64
    };
    let from = (meta.page.max(1) as u64 - 1) * per_page + 1;
    let to = (from + rows_on_page as u64 - 1).min(meta.total);
    format!("Showing {}-{} of {}", from, to, meta.total)
}
