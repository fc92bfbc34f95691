//! Predicate evaluation: which records survive the current filters.
//!
//! A record matches when all three checks pass:
//!
//! ```text
//! match = (query text found in the searchable fields, or query empty)
//!       ∧ (every active field filter equals the record's field)
//!       ∧ (timestamp field inside the date range, or no bound set)
//! ```
//!
//! Evaluation never fails. A missing or malformed field simply does not
//! match an active filter.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeekerError};
use crate::record::Record;
use crate::value::{Number, Timestamp, Value};

/// The "no filter" option shown in select controls.
pub const ALL: &str = "All";

/// Offset from a day's first millisecond to its last.
pub const LAST_MILLISECOND_OF_DAY: i64 = 86_399_999;

/// Returns `true` for values that mean "do not filter on this field".
///
/// Empty strings and [`ALL`] (in any case) are sentinels.
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included, if bounded.
    pub from: Option<NaiveDate>,
    /// Last day included, through its final millisecond, if bounded.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    /// Parses the text of two date inputs. Empty text leaves a bound unset.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(DateRange {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }

    /// Returns `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Earliest instant admitted, if bounded below.
    pub fn lower_bound(&self) -> Option<Timestamp> {
        self.from.map(Timestamp::start_of_day)
    }

    /// Latest instant admitted, if bounded above.
    pub fn upper_bound(&self) -> Option<Timestamp> {
        self.to
            .map(|day| Timestamp(Timestamp::start_of_day(day).0 + LAST_MILLISECOND_OF_DAY))
    }

    /// Tests an instant against both bounds.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.lower_bound().is_none_or(|lo| ts >= lo) && self.upper_bound().is_none_or(|hi| ts <= hi)
    }
}

fn parse_bound(text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| SeekerError::InvalidDate(text.to_string()))
}

/// The user's current filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query.
    pub query_text: String,
    /// Active field filters. Sentinel selections are never stored.
    pub field_filters: BTreeMap<String, String>,
    /// Optional date range.
    pub date_range: DateRange,
}

impl FilterState {
    /// Creates an empty filter state that matches everything.
    pub fn new() -> Self {
        FilterState::default()
    }

    /// Returns the active filter value for a field, if any.
    pub fn active_filter(&self, field: &str) -> Option<&str> {
        self.field_filters.get(field).map(String::as_str)
    }

    /// Sets or clears (on a sentinel) the filter for one field.
    pub fn set_field_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if is_sentinel(&value) {
            self.field_filters.remove(&field);
        } else {
            self.field_filters.insert(field, value);
        }
    }

    /// Returns `true` if no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.query_text.trim().is_empty()
            && self.field_filters.is_empty()
            && self.date_range.is_unbounded()
    }

    /// Human-readable list of the active criteria, or `None` if there are none.
    ///
    /// ```
    /// use viewdeck_seeker::FilterState;
    ///
    /// let mut filter = FilterState::new();
    /// filter.query_text = "auth".into();
    /// filter.set_field_filter("status", "Open");
    /// assert_eq!(filter.summary().as_deref(), Some("query \"auth\", status=Open"));
    /// ```
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        let query = self.query_text.trim();
        if !query.is_empty() {
            parts.push(format!("query \"{query}\""));
        }
        for (field, value) in &self.field_filters {
            parts.push(format!("{field}={value}"));
        }
        if let Some(from) = self.date_range.from {
            parts.push(format!("from {from}"));
        }
        if let Some(to) = self.date_range.to {
            parts.push(format!("to {to}"));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Which fields of a record each kind of filter looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Fields concatenated for free-text search.
    #[serde(default)]
    pub searchable: Vec<String>,
    /// Fields that accept an equality filter.
    #[serde(default)]
    pub filterable: Vec<String>,
    /// Timestamp field checked by the date range.
    #[serde(default)]
    pub date_field: Option<String>,
}

impl FilterSpec {
    /// Returns `true` if `field` accepts an equality filter.
    pub fn is_filterable(&self, field: &str) -> bool {
        self.filterable.iter().any(|f| f == field)
    }
}

/// Tests one record against the filter state.
pub fn matches<R: Record + ?Sized>(record: &R, state: &FilterState, spec: &FilterSpec) -> bool {
    matches_text(record, &state.query_text, &spec.searchable)
        && spec
            .filterable
            .iter()
            .all(|field| matches_field(record, field, state.active_filter(field)))
        && matches_date(record, &state.date_range, spec.date_field.as_deref())
}

/// Case-insensitive substring search across the searchable fields.
pub fn matches_text<R: Record + ?Sized>(record: &R, query: &str, fields: &[String]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let haystack = fields
        .iter()
        .filter_map(|field| record.field(field).text())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    haystack.contains(&needle)
}

/// Equality test for one field filter. A sentinel or absent filter passes.
pub fn matches_field<R: Record + ?Sized>(record: &R, field: &str, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted.filter(|w| !is_sentinel(w)) else {
        return true;
    };
    match record.field(field) {
        Value::String(s) => s.to_lowercase() == wanted.to_lowercase(),
        Value::Number(n) => {
            Number::parse(wanted).and_then(|w| n.compare(w)) == Some(Ordering::Equal)
        }
        Value::Bool(b) => wanted
            .trim()
            .to_ascii_lowercase()
            .parse::<bool>()
            .is_ok_and(|w| w == b),
        Value::Timestamp(t) => Timestamp::parse(wanted) == Some(t),
        Value::None => false,
    }
}

/// Date-range test. Fails closed on missing or malformed timestamps once
/// any bound is set.
pub fn matches_date<R: Record + ?Sized>(
    record: &R,
    range: &DateRange,
    field: Option<&str>,
) -> bool {
    if range.is_unbounded() {
        return true;
    }
    let Some(field) = field else {
        return true;
    };
    record
        .field(field)
        .timestamp()
        .is_some_and(|ts| range.contains(ts))
}

/// Keeps the matching records, in their original order.
pub fn filter<'a, R: Record>(records: &'a [R], state: &FilterState, spec: &FilterSpec) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches(*record, state, spec))
        .collect()
}

/// Distinct values of a field across the collection, sorted
/// case-insensitively. Values differing only in case are listed once.
pub fn distinct_values<R: Record>(records: &[R], field: &str) -> Vec<String> {
    let distinct: BTreeSet<(String, String)> = records
        .iter()
        .filter_map(|record| record.field(field).text())
        .filter(|text| !is_sentinel(text))
        .map(|text| (text.to_lowercase(), text.into_owned()))
        .collect();

    let mut values = Vec::with_capacity(distinct.len());
    let mut last_folded: Option<String> = None;
    for (folded, text) in distinct {
        if last_folded.as_deref() != Some(folded.as_str()) {
            values.push(text);
            last_folded = Some(folded);
        }
    }
    values
}

/// Options for a field's filter control: [`ALL`] followed by
/// [`distinct_values`].
pub fn filter_options<R: Record>(records: &[R], field: &str) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    options.extend(distinct_values(records, field));
    options
}
