//! # Viewdeck - derived list views over fetched records
//!
//! Viewdeck turns an in-memory collection into the page a user sees: the
//! records that match the search box and filter controls, in the selected
//! order, cut to the selected page. It sits on top of [`viewdeck_seeker`],
//! which holds the filter, sort and paginate stages, and adds what a page
//! needs around them:
//!
//! - [`ViewConfig`]: what a page searches, filters and sorts by, loaded from
//!   YAML or JSON
//! - [`ViewState`]: the user's current choices, with page-reset rules
//! - [`ViewController`]: the control surface; each control recomputes and
//!   renders exactly once
//! - [`Renderer`]: where results go, with a MiniJinja [`TemplateRenderer`]
//!   for HTML and plain text
//! - [`records_at`] and [`RequestGeneration`]: turning fetched JSON into
//!   records and dropping stale responses
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use viewdeck::{records_at, Recorder, ViewConfig, ViewController};
//!
//! let doc = json!({"tasks": {"items": [
//!     {"id": 1, "status": "Open"},
//!     {"id": 2, "status": "Closed"},
//!     {"id": 3, "status": "Open"},
//! ]}});
//! let records = records_at(&doc, "tasks.items").unwrap();
//!
//! let config = ViewConfig::new("id").filterable(["status"]).page_sizes([1, 10], 1);
//! let mut controller = ViewController::new(config, records, Recorder::new()).unwrap();
//!
//! controller.set_field_filter("status", "Open").unwrap();
//! let view = controller.view();
//! assert_eq!(view.total_count, 2);
//! assert_eq!(view.page_count, 2);
//! assert_eq!(view.items[0].get("id"), Some(&json!(1)));
//! ```
//!
//! ## Failure model
//!
//! Nothing here is fatal. Rejected control input returns a [`ViewError`]
//! and leaves the state alone. A failed fetch keeps the cached records (or
//! shows the empty view on first load). The worst case is always an empty
//! page with `page_count == 1`.

mod config;
mod controller;
mod error;
mod loader;
pub mod render;
mod state;
mod view;

pub use config::{ColumnSpec, SortKeySpec, ViewConfig, CARD_PAGE_SIZES, TABLE_PAGE_SIZES};
pub use controller::{recompute, RefreshOutcome, ViewController};
pub use error::{ConfigError, LoadError, Result, ViewError};
pub use loader::{parse_records, records_at, records_from_rows, FetchTicket, RequestGeneration};
pub use render::{
    describe, from_fn, Format, FnRenderer, PageView, Pager, Recorder, Renderer, TemplateRenderer,
};
pub use state::ViewState;
pub use view::ViewResult;

pub use viewdeck_seeker;
