//! Ordering of filtered records.
//!
//! Provides [`Dir`] for sort direction, [`SortKind`] for how a key's values
//! compare, and [`SortState`] for the user's current sort selection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::{Timestamp, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the values of a sort key compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Case-folded lexicographic. Missing values compare as "".
    #[default]
    Text,
    /// Epoch milliseconds. Unparseable or missing timestamps count as the epoch.
    Temporal,
    /// Numeric. Non-numeric values go after every number in ascending order.
    Numeric,
}

/// The current sort selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    /// The field to sort by.
    pub key: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: Dir,
}

impl SortState {
    /// Creates a new ascending sort on `key`.
    pub fn asc(key: impl Into<String>) -> Self {
        SortState::new(key, Dir::Asc)
    }

    /// Creates a new descending sort on `key`.
    pub fn desc(key: impl Into<String>) -> Self {
        SortState::new(key, Dir::Desc)
    }

    /// Creates a new sort with the given direction.
    pub fn new(key: impl Into<String>, direction: Dir) -> Self {
        SortState {
            key: key.into(),
            direction,
        }
    }

    /// Compares two records by this sort's key and direction.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R, kind: SortKind) -> Ordering {
        let base = compare_values(&a.field(&self.key), &b.field(&self.key), kind);
        self.direction.apply(base)
    }
}

/// Ascending comparison of two field values under a sort kind.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Text => fold(a).cmp(&fold(b)),
        SortKind::Temporal => epoch_or_zero(a).cmp(&epoch_or_zero(b)),
        SortKind::Numeric => match (a.number(), b.number()) {
            (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn fold(value: &Value<'_>) -> String {
    value.text().map(|t| t.to_lowercase()).unwrap_or_default()
}

// Unparseable timestamps sort as the epoch rather than being rejected.
fn epoch_or_zero(value: &Value<'_>) -> Timestamp {
    value.timestamp().unwrap_or(Timestamp::EPOCH)
}

/// Sorts records in place. The sort is stable: records whose keys compare
/// equal keep their relative order.
pub fn sort_records<R: Record>(records: &mut [&R], sort: &SortState, kind: SortKind) {
    records.sort_by(|a, b| sort.compare(*a, *b, kind));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::JsonRecord;
    use crate::value::Number;

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn dir_toggle_and_display() {
        assert_eq!(Dir::Asc.toggled(), Dir::Desc);
        assert_eq!(Dir::Desc.toggled(), Dir::Asc);
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn text_compare_is_case_folded() {
        let a = Value::String("apple");
        let b = Value::String("Banana");
        assert_eq!(compare_values(&a, &b, SortKind::Text), Ordering::Less);
        assert_eq!(
            compare_values(&Value::String("ABC"), &Value::String("abc"), SortKind::Text),
            Ordering::Equal
        );
        // Missing compares as the empty string.
        assert_eq!(compare_values(&Value::None, &a, SortKind::Text), Ordering::Less);
    }

    #[test]
    fn temporal_compare_falls_back_to_epoch() {
        let early = Value::String("1969-12-31T00:00:00Z");
        let broken = Value::String("whenever");
        let late = Value::String("2024-01-01");

        assert_eq!(compare_values(&broken, &late, SortKind::Temporal), Ordering::Less);
        assert_eq!(compare_values(&early, &broken, SortKind::Temporal), Ordering::Less);
        assert_eq!(
            compare_values(&broken, &Value::None, SortKind::Temporal),
            Ordering::Equal
        );
    }

    #[test]
    fn numeric_compare_puts_non_numbers_last() {
        let two = Value::Number(Number::I64(2));
        let ten = Value::String("10");
        assert_eq!(compare_values(&two, &ten, SortKind::Numeric), Ordering::Less);
        assert_eq!(
            compare_values(&Value::None, &two, SortKind::Numeric),
            Ordering::Greater
        );
        // Text ordering would say "10" < "2".
        assert_eq!(compare_values(&two, &ten, SortKind::Text), Ordering::Greater);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let records: Vec<JsonRecord> = [("b", 1), ("a", 2), ("b", 3), ("a", 4)]
            .into_iter()
            .map(|(group, id)| JsonRecord::new().with("group", group).with("id", id))
            .collect();

        let ids = |refs: &[&JsonRecord]| -> Vec<i64> {
            refs.iter()
                .map(|r| r.get("id").and_then(|v| v.as_i64()).unwrap())
                .collect()
        };

        let mut refs: Vec<&JsonRecord> = records.iter().collect();
        sort_records(&mut refs, &SortState::asc("group"), SortKind::Text);
        assert_eq!(ids(&refs), vec![2, 4, 1, 3]);

        let mut refs: Vec<&JsonRecord> = records.iter().collect();
        sort_records(&mut refs, &SortState::desc("group"), SortKind::Text);
        assert_eq!(ids(&refs), vec![1, 3, 2, 4]);
    }

    #[test]
    fn sort_state_serde_names() {
        let sort: SortState = serde_json::from_str(r#"{"key": "due", "direction": "desc"}"#).unwrap();
        assert_eq!(sort, SortState::desc("due"));

        let defaulted: SortState = serde_json::from_str(r#"{"key": "title"}"#).unwrap();
        assert_eq!(defaulted.direction, Dir::Asc);
    }
}
