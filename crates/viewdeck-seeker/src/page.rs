//! Pagination over a sorted sequence.
//!
//! Pages are 1-based. A sequence always has at least one page, so the empty
//! sequence has a single empty page.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeekerError;

/// Requested page position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    /// 1-based page index. May exceed the page count; it is clamped on use.
    pub index: usize,
    /// Items per page, at least 1.
    pub size: usize,
}

impl PageState {
    /// First page with the given size.
    pub fn new(size: usize) -> Self {
        PageState {
            index: 1,
            size: size.max(1),
        }
    }
}

/// The resolved window of one page.
///
/// `start..end` is the half-open index range into the full sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageWindow {
    /// Number of pages, at least 1.
    pub page_count: usize,
    /// Clamped 1-based page index.
    pub current_page: usize,
    /// First index on the page.
    pub start: usize,
    /// One past the last index on the page.
    pub end: usize,
}

impl PageWindow {
    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Returns `true` if a following page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    /// Applies the window to the sequence it was computed for.
    ///
    /// Out-of-range windows (a different, shorter sequence) are trimmed
    /// rather than panicking.
    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// Number of pages needed for `len` items: `max(1, ceil(len / size))`.
pub fn page_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1)).max(1)
}

/// Resolves the window for `page` over a sequence of `len` items.
///
/// ```
/// use viewdeck_seeker::{paginate, PageState};
///
/// let window = paginate(23, &PageState { index: 3, size: 9 });
/// assert_eq!(window.page_count, 3);
/// assert_eq!(window.start..window.end, 18..23);
///
/// // Beyond the last page clamps to it.
/// let window = paginate(23, &PageState { index: 40, size: 9 });
/// assert_eq!(window.current_page, 3);
/// ```
pub fn paginate(len: usize, page: &PageState) -> PageWindow {
    let size = page.size.max(1);
    let page_count = page_count(len, size);
    let current_page = page.index.clamp(1, page_count);
    let start = (current_page - 1) * size;
    let end = start.saturating_add(size).min(len);
    PageWindow {
        page_count,
        current_page,
        start: start.min(end),
        end,
    }
}

/// A pager control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageNav {
    /// Jump to page 1.
    First,
    /// One page back, stopping at 1.
    Prev,
    /// One page forward, stopping at the last page.
    Next,
    /// Jump to the last page.
    Last,
    /// Jump to an explicit page, clamped into range.
    Index(usize),
}

impl PageNav {
    /// Target page given the current page and page count.
    pub fn resolve(self, current: usize, page_count: usize) -> usize {
        let page_count = page_count.max(1);
        match self {
            PageNav::First => 1,
            PageNav::Prev => current.saturating_sub(1).max(1),
            PageNav::Next => current.saturating_add(1).min(page_count),
            PageNav::Last => page_count,
            PageNav::Index(n) => n.clamp(1, page_count),
        }
    }
}

impl FromStr for PageNav {
    type Err = SeekerError;

    /// Parses `first`, `prev`/`previous`, `next`, `last` or a page number.
    ///
    /// Negative numbers and zero are accepted and resolve to page 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.to_ascii_lowercase().as_str() {
            "first" => Ok(PageNav::First),
            "prev" | "previous" => Ok(PageNav::Prev),
            "next" => Ok(PageNav::Next),
            "last" => Ok(PageNav::Last),
            _ => text
                .parse::<i64>()
                .map(|n| PageNav::Index(usize::try_from(n).unwrap_or(0)))
                .map_err(|_| SeekerError::InvalidPage(text.to_string())),
        }
    }
}
