//! ViewResult: the output of one pipeline run.
//!
//! A `ViewResult` holds everything a renderer needs to draw one page of a
//! collection plus its pager: the items on the page, how many records
//! survived filtering, and where the page sits in that filtered sequence.

use serde::Serialize;
use viewdeck_seeker::PageWindow;

/// One page of a filtered, sorted collection.
///
/// Invariants:
/// - `page_count >= 1`, even for an empty collection
/// - `1 <= current_page <= page_count`
/// - `window_end - window_start == items.len()`
/// - `window_start <= window_end <= total_count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewResult<T> {
    /// Items on the current page, in sorted order.
    pub items: Vec<T>,
    /// Records that survived filtering, across all pages.
    pub total_count: usize,
    /// Number of pages.
    pub page_count: usize,
    /// 1-based current page.
    pub current_page: usize,
    /// Index of the first item within the filtered sequence.
    pub window_start: usize,
    /// One past the index of the last item within the filtered sequence.
    pub window_end: usize,
}

impl<T> ViewResult<T> {
    /// The view of an empty collection.
    pub fn empty() -> Self {
        ViewResult {
            items: Vec::new(),
            total_count: 0,
            page_count: 1,
            current_page: 1,
            window_start: 0,
            window_end: 0,
        }
    }

    /// Builds a result from a resolved window and the items inside it.
    pub(crate) fn from_window(items: Vec<T>, total_count: usize, window: PageWindow) -> Self {
        debug_assert_eq!(items.len(), window.len());
        ViewResult {
            items,
            total_count,
            page_count: window.page_count,
            current_page: window.current_page,
            window_start: window.start,
            window_end: window.end,
        }
    }

    /// The window this page covers.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            page_count: self.page_count,
            current_page: self.current_page,
            start: self.window_start,
            end: self.window_end,
        }
    }

    /// Returns true if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Converts the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ViewResult<U> {
        ViewResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_count: self.page_count,
            current_page: self.current_page,
            window_start: self.window_start,
            window_end: self.window_end,
        }
    }
}

impl<T: Clone> ViewResult<&T> {
    /// Clones the borrowed items into an owned result.
    pub fn cloned(&self) -> ViewResult<T> {
        self.clone().map(T::clone)
    }
}

impl<T> Default for ViewResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
