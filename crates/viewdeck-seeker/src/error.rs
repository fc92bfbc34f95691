//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while reading user-supplied control input.
///
/// Evaluation itself never fails: malformed record values are handled where
/// they are read. These errors only come from parsing the text a user typed
/// into a control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeekerError {
    /// Date bound that is neither empty nor `YYYY-MM-DD`.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Text that should have been a whole number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Page navigation text that is neither a keyword nor a number.
    #[error("invalid page '{0}': expected first, prev, next, last or a page number")]
    InvalidPage(String),
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
