//! Seeker - the filter, sort and paginate stages of the view engine.
//!
//! Every page of the site shows the same kind of derived view: take an
//! in-memory collection of records, keep the ones that match the user's
//! filters, order them, and cut out one page. This crate holds those three
//! stages as plain functions over any [`Record`]:
//!
//! - [`predicate`]: free-text search, per-field equality and date ranges
//! - [`ordering`]: stable, case-folded, temporal or numeric sorting
//! - [`page`]: page counts, clamping and the half-open window
//!
//! # Quick Start
//!
//! ```rust
//! use viewdeck_seeker::{
//!     filter, paginate, sort_records, FilterSpec, FilterState, JsonRecord, PageState,
//!     SortKind, SortState,
//! };
//!
//! let records: Vec<JsonRecord> = (1..=5)
//!     .map(|id| {
//!         JsonRecord::new()
//!             .with("id", id)
//!             .with("status", if id % 2 == 0 { "Closed" } else { "Open" })
//!     })
//!     .collect();
//!
//! let spec = FilterSpec {
//!     filterable: vec!["status".into()],
//!     ..FilterSpec::default()
//! };
//! let mut state = FilterState::new();
//! state.set_field_filter("status", "Open");
//!
//! let mut kept = filter(&records, &state, &spec);
//! sort_records(&mut kept, &SortState::desc("id"), SortKind::Numeric);
//!
//! let window = paginate(kept.len(), &PageState { index: 1, size: 2 });
//! let page = window.slice(&kept);
//! assert_eq!(window.page_count, 2);
//! assert_eq!(page[0].get("id"), Some(&serde_json::json!(5)));
//! ```
//!
//! # Failure Model
//!
//! Evaluation never fails. Malformed record values are handled where they
//! are read: a bad timestamp never matches a date range and sorts as the
//! epoch. Only parsing of user-typed control input returns [`SeekerError`].

mod error;
pub mod ordering;
pub mod page;
pub mod predicate;
mod record;
mod value;

pub use error::{Result, SeekerError};
pub use ordering::{compare_values, sort_records, Dir, SortKind, SortState};
pub use page::{page_count, paginate, PageNav, PageState, PageWindow};
pub use predicate::{
    distinct_values, filter, filter_options, is_sentinel, matches, DateRange, FilterSpec,
    FilterState, ALL,
};
pub use record::{JsonRecord, Record};
pub use value::{Number, Timestamp, Value};
