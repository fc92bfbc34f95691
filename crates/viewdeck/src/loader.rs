//! Turning fetched documents into records.
//!
//! Pages fetch one JSON document and view one array inside it. The adapters
//! here reduce that document to a flat `Vec<JsonRecord>`; the fetch itself
//! belongs to the caller. [`RequestGeneration`] tags each fetch so a slow
//! response can't overwrite a newer one.

use serde_json::{Map, Value};
use viewdeck_seeker::JsonRecord;

use crate::error::LoadError;

/// Issues fetch tickets and remembers which one is latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestGeneration {
    latest: u64,
}

/// Identifies one fetch. Only the latest ticket may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Generation number of the fetch.
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl RequestGeneration {
    /// Starts at generation zero with no ticket issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every earlier one.
    pub fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    /// Returns `true` if no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// The most recently issued generation, or 0.
    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// Extracts the records under a dotted path.
///
/// `"sections"` reads `document.sections`, `"tasks.items"` reads
/// `document.tasks.items`, and an empty path means the document itself.
/// Array elements that are not objects are skipped.
///
/// ```
/// use serde_json::json;
/// use viewdeck::records_at;
///
/// let doc = json!({"tasks": {"items": [{"id": 1}, {"id": 2}, "stray"]}});
/// let records = records_at(&doc, "tasks.items").unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub fn records_at(document: &Value, path: &str) -> Result<Vec<JsonRecord>, LoadError> {
    let mut current = document;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = current
            .get(segment)
            .ok_or_else(|| LoadError::MissingPath(path.to_string()))?;
    }
    let items = current
        .as_array()
        .ok_or_else(|| LoadError::NotAnArray(path.to_string()))?;
    Ok(items
        .iter()
        .filter_map(|item| item.as_object().cloned().map(JsonRecord::from))
        .collect())
}

/// Parses a JSON body and extracts the records under `path`.
pub fn parse_records(body: &str, path: &str) -> Result<Vec<JsonRecord>, LoadError> {
    let document: Value = serde_json::from_str(body)?;
    records_at(&document, path)
}

/// Builds records from table rows, pairing each cell with its header.
///
/// Short rows leave the trailing fields missing; extra cells are dropped.
pub fn records_from_rows<H, R, C>(headers: &[H], rows: impl IntoIterator<Item = R>) -> Vec<JsonRecord>
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: Into<String>,
{
    rows.into_iter()
        .map(|row| {
            let fields: Map<String, Value> = headers
                .iter()
                .zip(row)
                .map(|(header, cell)| (header.as_ref().to_string(), Value::String(cell.into())))
                .collect();
            JsonRecord::from(fields)
        })
        .collect()
}
