//! Per-page view configuration.
//!
//! Each page of the site declares which fields its search box looks at,
//! which fields get a filter control, how its sort keys compare, and which
//! page sizes its size selector offers. A [`ViewConfig`] can be built in code
//! or loaded from YAML or JSON:
//!
//! ```yaml
//! searchable: [title, owner]
//! filterable: [status]
//! date_field: due
//! sort_keys:
//!   - { key: title }
//!   - { key: due, kind: temporal }
//! default_sort: { key: due, direction: desc }
//! page_sizes: [10, 20, 50]
//! default_page_size: 10
//! columns:
//!   - { field: title, label: Title }
//!   - { field: due }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use viewdeck_seeker::{Dir, FilterSpec, SortKind, SortState};

use crate::error::ConfigError;

/// Page sizes offered by card-grid pages.
pub const CARD_PAGE_SIZES: [usize; 4] = [6, 9, 12, 18];

/// Page sizes offered by table pages.
pub const TABLE_PAGE_SIZES: [usize; 3] = [10, 20, 50];

/// A declared sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKeySpec {
    /// Field name.
    pub key: String,
    /// How values compare.
    #[serde(default)]
    pub kind: SortKind,
}

/// A displayed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Field shown in the column.
    pub field: String,
    /// Header text; defaults to the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColumnSpec {
    /// Creates a column with an explicit header.
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnSpec {
            field: field.into(),
            label: Some(label.into()),
        }
    }

    /// The header text.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }
}

/// Everything that varies between pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Search, filter and date fields.
    #[serde(flatten)]
    pub filter: FilterSpec,
    /// Sortable keys.
    pub sort_keys: Vec<SortKeySpec>,
    /// Sort applied when the page loads.
    pub default_sort: SortState,
    /// Allowed page sizes.
    pub page_sizes: Vec<usize>,
    /// Page size applied when the page loads.
    pub default_page_size: usize,
    /// Columns for the reference renderer.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl ViewConfig {
    /// Starts a table-style config sorted ascending by `default_sort_key`.
    ///
    /// The key is declared as a text sort key; redeclare it with
    /// [`sort_key`](Self::sort_key) to change its kind.
    pub fn new(default_sort_key: impl Into<String>) -> Self {
        let key = default_sort_key.into();
        ViewConfig {
            filter: FilterSpec::default(),
            sort_keys: vec![SortKeySpec {
                key: key.clone(),
                kind: SortKind::Text,
            }],
            default_sort: SortState::asc(key),
            page_sizes: TABLE_PAGE_SIZES.to_vec(),
            default_page_size: TABLE_PAGE_SIZES[0],
            columns: Vec::new(),
        }
    }

    /// Sets the free-text search fields.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fields that get an equality filter.
    pub fn filterable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.filterable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the timestamp field the date range applies to.
    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.filter.date_field = Some(field.into());
        self
    }

    /// Declares (or redeclares) a sort key.
    pub fn sort_key(mut self, key: impl Into<String>, kind: SortKind) -> Self {
        let key = key.into();
        match self.sort_keys.iter_mut().find(|spec| spec.key == key) {
            Some(spec) => spec.kind = kind,
            None => self.sort_keys.push(SortKeySpec { key, kind }),
        }
        self
    }

    /// Sets the initial sort direction.
    pub fn default_direction(mut self, direction: Dir) -> Self {
        self.default_sort.direction = direction;
        self
    }

    /// Sets the allowed page sizes and the initial one.
    pub fn page_sizes(mut self, sizes: impl IntoIterator<Item = usize>, default: usize) -> Self {
        self.page_sizes = sizes.into_iter().collect();
        self.default_page_size = default;
        self
    }

    /// Appends a displayed column.
    pub fn column(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec::new(field, label));
        self
    }

    /// Parses and validates a YAML config.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let read = || {
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            "json" => Self::from_json_str(&read()?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Checks the invariants the view state relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_sizes.is_empty() {
            return Err(ConfigError::NoPageSizes);
        }
        if self.page_sizes.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.allows_page_size(self.default_page_size) {
            return Err(ConfigError::DefaultPageSize {
                size: self.default_page_size,
                allowed: self.page_sizes.clone(),
            });
        }
        if self.sort_kind(&self.default_sort.key).is_none() {
            return Err(ConfigError::UnknownDefaultSort(self.default_sort.key.clone()));
        }
        Ok(())
    }

    /// Returns `true` if `size` is one of the allowed page sizes.
    pub fn allows_page_size(&self, size: usize) -> bool {
        self.page_sizes.contains(&size)
    }

    /// The comparison kind of a declared sort key.
    pub fn sort_kind(&self, key: &str) -> Option<SortKind> {
        self.sort_keys
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.kind)
    }
}
