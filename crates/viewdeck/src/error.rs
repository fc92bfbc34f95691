//! Error types for the view layer.

use std::io;
use std::path::PathBuf;

use viewdeck_seeker::SeekerError;

/// Errors raised when a control event is rejected.
///
/// A rejected event leaves the view state exactly as it was, so callers can
/// report the error and keep showing the last valid view.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Page size outside the page's allowed set.
    #[error("page size {size} is not one of {allowed:?}")]
    UnsupportedPageSize { size: usize, allowed: Vec<usize> },

    /// Sort key the page does not declare.
    #[error("'{0}' is not a sortable key")]
    UnknownSortKey(String),

    /// Field the page does not offer a filter for.
    #[error("'{0}' is not a filterable field")]
    UnknownFilterField(String),

    /// Date bound on a page without a date field.
    #[error("this view has no date field to filter on")]
    NoDateField,

    /// Malformed control text (date, number or page).
    #[error(transparent)]
    Input(#[from] SeekerError),

    /// Template compilation or rendering failure.
    #[error("render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Errors raised while loading or validating a page configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML syntax or shape error.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or shape error.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("unsupported config format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// No page sizes were given.
    #[error("page size list is empty")]
    NoPageSizes,

    /// A page size of zero was given.
    #[error("page sizes must be at least 1")]
    ZeroPageSize,

    /// The default page size is not in the allowed set.
    #[error("default page size {size} is not one of {allowed:?}")]
    DefaultPageSize { size: usize, allowed: Vec<usize> },

    /// The default sort key is not declared.
    #[error("default sort key '{0}' is not a declared sort key")]
    UnknownDefaultSort(String),
}

/// Errors raised while turning a fetched document into records.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Body was not valid JSON.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Path does not lead anywhere in the document.
    #[error("no value at '{0}' in the document")]
    MissingPath(String),

    /// Path leads to something other than an array.
    #[error("value at '{0}' is not an array")]
    NotAnArray(String),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
