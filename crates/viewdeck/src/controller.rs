//! The view controller: one page's records, state and renderer.
//!
//! [`recompute`] is the whole pipeline as a pure function: filter, stable
//! sort, paginate. [`ViewController`] wraps it with the control surface a
//! page exposes. Every control method changes the state, recomputes once and
//! renders once; rejected input changes nothing and renders nothing.
//!
//! ```text
//! records ─► filter ─► sort ─► paginate ─► ViewResult ─► Renderer
//!              ▲         ▲         ▲
//!              └──── ViewState ────┘
//! ```

use std::fmt::Display;

use tracing::{debug, warn};
use viewdeck_seeker::{
    filter, filter_options, paginate, sort_records, DateRange, Dir, PageNav, PageWindow,
    Record,
};

use crate::config::ViewConfig;
use crate::error::{ConfigError, Result, ViewError};
use crate::loader::{FetchTicket, RequestGeneration};
use crate::render::Renderer;
use crate::state::ViewState;
use crate::view::ViewResult;

/// Derives one page of `records` from the state.
///
/// Pure: the same records, state and config always give the same result.
/// The sort kind comes from the config's declaration of the sort key;
/// undeclared keys sort as text.
pub fn recompute<'a, R: Record>(
    records: &'a [R],
    state: &ViewState,
    config: &ViewConfig,
) -> ViewResult<&'a R> {
    let mut kept = filter(records, state.filter(), &config.filter);
    let kind = config.sort_kind(&state.sort().key).unwrap_or_default();
    sort_records(&mut kept, state.sort(), kind);

    let window = paginate(kept.len(), state.page());
    let items = window.slice(&kept).to_vec();
    ViewResult::from_window(items, kept.len(), window)
}

/// What happened to a fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the collection.
    Applied { count: usize },
    /// The fetch failed; the cached collection stays.
    Fallback,
    /// A newer fetch was issued; the response was dropped.
    Stale,
}

/// Owns one page's collection, state and renderer.
pub struct ViewController<R, Rd> {
    config: ViewConfig,
    state: ViewState,
    records: Vec<R>,
    renderer: Rd,
    generation: RequestGeneration,
    window: PageWindow,
}

impl<R, Rd> ViewController<R, Rd>
where
    R: Record,
    Rd: Renderer<R>,
{
    /// Validates the config and renders the initial view.
    pub fn new(
        config: ViewConfig,
        records: Vec<R>,
        renderer: Rd,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let state = ViewState::new(&config);
        let window = paginate(0, state.page());
        let mut controller = ViewController {
            config,
            state,
            records,
            renderer,
            generation: RequestGeneration::new(),
            window,
        };
        controller.update();
        Ok(controller)
    }

    /// Like [`new`](Self::new), but takes the outcome of the initial load.
    /// A failed load is logged and shows the empty view.
    pub fn from_load<E: Display>(
        config: ViewConfig,
        loaded: std::result::Result<Vec<R>, E>,
        renderer: Rd,
    ) -> std::result::Result<Self, ConfigError> {
        let records = loaded.unwrap_or_else(|err| {
            warn!(%err, "initial load failed, showing empty view");
            Vec::new()
        });
        Self::new(config, records, renderer)
    }

    /// The current view.
    pub fn view(&self) -> ViewResult<&R> {
        recompute(&self.records, &self.state, &self.config)
    }

    /// The current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The page configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The loaded collection, unfiltered.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Window of the last rendered view.
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// The renderer.
    pub fn renderer(&self) -> &Rd {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Rd {
        &mut self.renderer
    }

    /// Consumes the controller, returning its renderer.
    pub fn into_renderer(self) -> Rd {
        self.renderer
    }

    /// Options for a filter control over the loaded collection.
    pub fn filter_options(&self, field: &str) -> Vec<String> {
        filter_options(&self.records, field)
    }

    /// Sets the free-text query.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.state.set_query_text(text);
        self.update();
    }

    /// Sets a field filter. The field must be declared filterable.
    pub fn set_field_filter(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        if !self.config.filter.is_filterable(field) {
            warn!(field, "rejected filter on undeclared field");
            return Err(ViewError::UnknownFilterField(field.to_string()));
        }
        self.state.set_field_filter(field, value);
        self.update();
        Ok(())
    }

    /// Replaces both date bounds. Bounds are rejected when the page has
    /// no date field; clearing them is always allowed.
    pub fn set_date_range(&mut self, range: DateRange) -> Result<()> {
        self.check_date_range(&range)?;
        self.state.set_date_range(range);
        self.update();
        Ok(())
    }

    /// Parses both date bounds; empty text leaves a bound open.
    pub fn set_date_range_input(&mut self, from: &str, to: &str) -> Result<()> {
        let range =
            DateRange::parse(from, to).inspect_err(|err| warn!(%err, "rejected date range"))?;
        self.set_date_range(range)
    }

    fn check_date_range(&self, range: &DateRange) -> Result<()> {
        if self.config.filter.date_field.is_none() && !range.is_unbounded() {
            warn!("rejected date range on a view without a date field");
            return Err(ViewError::NoDateField);
        }
        Ok(())
    }

    /// Clears the query, field filters and date range.
    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.update();
    }

    /// Selects a declared sort key, toggling direction if it is already
    /// selected.
    pub fn set_sort_key(&mut self, key: &str) -> Result<()> {
        if self.config.sort_kind(key).is_none() {
            warn!(key, "rejected undeclared sort key");
            return Err(ViewError::UnknownSortKey(key.to_string()));
        }
        self.state.set_sort_key(key);
        self.update();
        Ok(())
    }

    /// Sets the sort direction, keeping the key.
    pub fn set_sort_direction(&mut self, direction: Dir) {
        self.state.set_sort_direction(direction);
        self.update();
    }

    /// Sets the page size; it must be one of the allowed sizes.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        self.state.set_page_size(size)?;
        self.update();
        Ok(())
    }

    /// Parses and sets the page size.
    pub fn set_page_size_input(&mut self, text: &str) -> Result<()> {
        self.state.set_page_size_input(text)?;
        self.update();
        Ok(())
    }

    /// Moves relative to the last rendered page.
    pub fn go_to_page(&mut self, nav: PageNav) {
        let target = nav.resolve(self.window.current_page, self.window.page_count);
        self.state.set_page_index(target);
        self.update();
    }

    /// Parses and jumps to a page number.
    pub fn set_page_index_input(&mut self, text: &str) -> Result<()> {
        self.state.set_page_index_input(text)?;
        self.update();
        Ok(())
    }

    /// Applies several state changes and renders once.
    ///
    /// The closure's changes are kept even if it reports an error through
    /// its return value.
    pub fn batch<T>(&mut self, apply: impl FnOnce(&mut ViewState) -> T) -> T {
        let out = apply(&mut self.state);
        self.update();
        out
    }

    /// Starts a fetch. Any earlier ticket becomes stale.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        let ticket = self.generation.issue();
        debug!(generation = ticket.generation(), "fetch started");
        ticket
    }

    /// Applies a fetch response if its ticket is still the latest.
    ///
    /// Failures keep the cached collection and re-render it; they are
    /// logged, never returned.
    pub fn complete_refresh<E: Display>(
        &mut self,
        ticket: FetchTicket,
        response: std::result::Result<Vec<R>, E>,
    ) -> RefreshOutcome {
        if !self.generation.is_current(ticket) {
            debug!(
                generation = ticket.generation(),
                latest = self.generation.latest(),
                "discarding stale fetch response"
            );
            return RefreshOutcome::Stale;
        }
        match response {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.update();
                RefreshOutcome::Applied { count }
            }
            Err(err) => {
                warn!(%err, cached = self.records.len(), "fetch failed, keeping cached records");
                self.update();
                RefreshOutcome::Fallback
            }
        }
    }

    fn update(&mut self) {
        let view = recompute(&self.records, &self.state, &self.config);
        debug!(
            total = view.total_count,
            page = view.current_page,
            pages = view.page_count,
            shown = view.len(),
            "recomputed view"
        );
        self.renderer.render(&view, &self.state);
        self.window = view.window();
    }
}

impl<R, Rd: std::fmt::Debug> std::fmt::Debug for ViewController<R, Rd> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("window", &self.window)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
