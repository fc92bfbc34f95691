//! The view state store.
//!
//! [`ViewState`] owns one page's query, filters, sort and page position. It
//! is the only place those values change, and every setter applies the same
//! reset rule: anything that changes the shape of the result (query, field
//! filter, date bound, sort, page size) sends the user back to page 1.
//! Jumping to a page is the one change that keeps everything else.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;
use viewdeck_seeker::{DateRange, Dir, FilterState, PageState, SeekerError, SortState};

use crate::config::ViewConfig;
use crate::error::{Result, ViewError};

/// Query, filter, sort and page state for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    filter: FilterState,
    sort: SortState,
    page: PageState,
    #[serde(skip)]
    page_sizes: Vec<usize>,
}

impl ViewState {
    /// Initial state for a page: empty query, default sort, page 1.
    pub fn new(config: &ViewConfig) -> Self {
        ViewState {
            filter: FilterState::new(),
            sort: config.default_sort.clone(),
            page: PageState::new(config.default_page_size),
            page_sizes: config.page_sizes.clone(),
        }
    }

    /// Current filter criteria.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Current sort selection.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Requested page position and size.
    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Allowed page sizes.
    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    /// Sets the free-text query.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.filter.query_text = text.into();
        self.reset_page();
    }

    /// Sets one field filter. "All" or an empty value clears it.
    pub fn set_field_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.filter.set_field_filter(field, value);
        self.reset_page();
    }

    /// Replaces both date bounds.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.filter.date_range = range;
        self.reset_page();
    }

    /// Sets the lower date bound.
    pub fn set_date_from(&mut self, from: Option<NaiveDate>) {
        self.filter.date_range.from = from;
        self.reset_page();
    }

    /// Sets the upper date bound.
    pub fn set_date_to(&mut self, to: Option<NaiveDate>) {
        self.filter.date_range.to = to;
        self.reset_page();
    }

    /// Parses and sets both date bounds from input text.
    ///
    /// Malformed text is rejected and the previous range kept.
    pub fn set_date_range_input(&mut self, from: &str, to: &str) -> Result<()> {
        let range = DateRange::parse(from, to).inspect_err(|err| warn!(%err, "rejected date range"))?;
        self.set_date_range(range);
        Ok(())
    }

    /// Clears the query, every field filter and the date range.
    pub fn clear_filters(&mut self) {
        self.filter = FilterState::new();
        self.reset_page();
    }

    /// Selects a sort key.
    ///
    /// Selecting the current key flips its direction; selecting another
    /// key sorts ascending by it.
    pub fn set_sort_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key == self.sort.key {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortState::asc(key);
        }
        self.reset_page();
    }

    /// Sets the sort direction without changing the key.
    pub fn set_sort_direction(&mut self, direction: Dir) {
        self.sort.direction = direction;
        self.reset_page();
    }

    /// Sets the page size. Sizes outside the allowed set are rejected.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if !self.page_sizes.contains(&size) {
            warn!(size, allowed = ?self.page_sizes, "rejected page size");
            return Err(ViewError::UnsupportedPageSize {
                size,
                allowed: self.page_sizes.clone(),
            });
        }
        self.page.size = size;
        self.reset_page();
        Ok(())
    }

    /// Parses and sets the page size from input text.
    pub fn set_page_size_input(&mut self, text: &str) -> Result<()> {
        let size = parse_count(text)?;
        self.set_page_size(size)
    }

    /// Jumps to a page. Indices below 1 are stored as 1; indices past the
    /// end are clamped when the view is recomputed.
    pub fn set_page_index(&mut self, index: usize) {
        self.page.index = index.max(1);
    }

    /// Parses and sets the page index from input text.
    ///
    /// Non-numeric text is rejected; negative numbers go to page 1.
    pub fn set_page_index_input(&mut self, text: &str) -> Result<()> {
        let trimmed = text.trim();
        let index = trimmed.parse::<i64>().map_err(|_| {
            warn!(input = trimmed, "rejected page index");
            ViewError::Input(SeekerError::InvalidNumber(trimmed.to_string()))
        })?;
        self.set_page_index(usize::try_from(index).unwrap_or(1));
        Ok(())
    }

    fn reset_page(&mut self) {
        self.page.index = 1;
    }
}

fn parse_count(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    trimmed.parse::<usize>().map_err(|_| {
        warn!(input = trimmed, "rejected page size");
        ViewError::Input(SeekerError::InvalidNumber(trimmed.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewState {
        let config = ViewConfig::new("title")
            .sort_key("due", viewdeck_seeker::SortKind::Temporal)
            .filterable(["status"])
            .page_sizes([10, 20, 50], 10);
        ViewState::new(&config)
    }

    fn on_page(state: &mut ViewState, index: usize) {
        state.set_page_index(index);
        assert_eq!(state.page().index, index);
    }

    #[test]
    fn defaults_come_from_config() {
        let state = state();
        assert_eq!(state.filter(), &FilterState::new());
        assert_eq!(state.sort(), &SortState::asc("title"));
        assert_eq!(state.page(), &PageState { index: 1, size: 10 });
        assert_eq!(state.page_sizes(), &[10, 20, 50]);
    }

    #[test]
    fn shape_changes_reset_page() {
        let mut state = state();

        on_page(&mut state, 4);
        state.set_query_text("report");
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.set_field_filter("status", "Open");
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.set_date_to(NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.set_sort_key("due");
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.set_sort_direction(Dir::Desc);
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.set_page_size(20).unwrap();
        assert_eq!(state.page().index, 1);

        on_page(&mut state, 4);
        state.clear_filters();
        assert_eq!(state.page().index, 1);
    }

    #[test]
    fn page_jump_keeps_other_fields() {
        let mut state = state();
        state.set_query_text("x");
        state.set_sort_key("due");
        let before = (state.filter().clone(), state.sort().clone(), state.page().size);

        state.set_page_index(7);
        assert_eq!(
            (state.filter().clone(), state.sort().clone(), state.page().size),
            before
        );
        assert_eq!(state.page().index, 7);
    }

    #[test]
    fn same_sort_key_toggles_direction() {
        let mut state = state();
        state.set_sort_key("title");
        assert_eq!(state.sort(), &SortState::desc("title"));
        state.set_sort_key("title");
        assert_eq!(state.sort(), &SortState::asc("title"));
    }

    #[test]
    fn new_sort_key_resets_direction() {
        let mut state = state();
        state.set_sort_key("title"); // now desc
        state.set_sort_key("due");
        assert_eq!(state.sort(), &SortState::asc("due"));
    }

    #[test]
    fn unsupported_page_size_keeps_last_value() {
        let mut state = state();
        state.set_page_size(50).unwrap();
        on_page(&mut state, 3);

        let err = state.set_page_size(7).unwrap_err();
        assert!(matches!(err, ViewError::UnsupportedPageSize { size: 7, .. }));
        assert_eq!(state.page(), &PageState { index: 3, size: 50 });

        assert!(state.set_page_size_input("ten").is_err());
        assert!(state.set_page_size_input("-10").is_err());
        assert_eq!(state.page().size, 50);

        state.set_page_size_input(" 20 ").unwrap();
        assert_eq!(state.page().size, 20);
    }

    #[test]
    fn page_index_input() {
        let mut state = state();
        state.set_page_index_input("5").unwrap();
        assert_eq!(state.page().index, 5);

        assert!(state.set_page_index_input("five").is_err());
        assert_eq!(state.page().index, 5);

        state.set_page_index_input("-2").unwrap();
        assert_eq!(state.page().index, 1);

        state.set_page_index(0);
        assert_eq!(state.page().index, 1);
    }

    #[test]
    fn date_range_input_rejects_malformed_dates() {
        let mut state = state();
        state.set_date_range_input("2024-01-01", "").unwrap();
        let range = state.filter().date_range;

        on_page(&mut state, 2);
        assert!(state.set_date_range_input("2024-01-01", "31/01/2024").is_err());
        assert_eq!(state.filter().date_range, range);
        assert_eq!(state.page().index, 2);
    }

    #[test]
    fn sentinel_filter_clears_field() {
        let mut state = state();
        state.set_field_filter("status", "Open");
        assert_eq!(state.filter().active_filter("status"), Some("Open"));
        state.set_field_filter("status", "All");
        assert_eq!(state.filter().active_filter("status"), None);
    }
}
