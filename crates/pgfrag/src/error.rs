//! Error types for pgfrag

use thiserror::Error;

/// Result type alias for fragment-building operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for fragment construction
///
/// Every variant is a synchronous validation failure raised before any
/// partial fragment text is returned. None of these are recoverable
/// internally; callers decide whether to retry with corrected input.
#[derive(Debug, Error)]
pub enum SqlError {
    /// INSERT or UPDATE given a record with zero columns
    #[error("insert data cannot be empty")]
    EmptyData,

    /// WHERE builder or UPDATE given a zero-key condition map
    #[error("WHERE clause cannot be empty")]
    EmptyWhere,

    /// INSERT-many given a zero-length row slice
    #[error("cannot insert an empty row set")]
    EmptyRows,

    /// INSERT-many rows with differing column sets
    #[error("row {row} does not match the first row's columns")]
    ShapeMismatch { row: usize },

    /// A zero-length list where at least one element is required
    #[error("cannot interpolate an empty list into SQL")]
    EmptyArray,

    /// Marker count and parameter count disagree
    #[error("placeholder/parameter mismatch: {0}")]
    PlaceholderMismatch(String),

    /// `add` called on a composer that was already built
    #[error("cannot add to a SQL builder after build() has been called")]
    AfterBuild,
}

impl SqlError {
    /// Create a placeholder-mismatch error
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::PlaceholderMismatch(message.into())
    }

    /// Check if this is an empty-list error
    pub fn is_empty_array(&self) -> bool {
        matches!(self, Self::EmptyArray)
    }

    /// Check if this is a row-shape error
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}
