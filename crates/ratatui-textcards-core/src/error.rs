//! Error types for host interaction and property parsing.

use thiserror::Error;

/// Failures reported by host capabilities.
///
/// None of these escape the controller: the data-validity gate downgrades them into overlay
/// messages or silent no-ops and logs them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A host query failed.
    #[error("host query failed: {0}")]
    Query(String),

    /// The host does not know the requested axis.
    #[error("unknown axis '{0}'")]
    UnknownAxis(String),
}

/// Result type for host capability calls.
pub type HostResult<T> = Result<T, HostError>;

/// The persisted sort order property held something other than a sort order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid sort order '{0}', expected 'asc' or 'desc'")]
pub struct ParseSortOrderError(pub String);

/// A host color string could not be read as `#rrggbb` / `#rgb`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color '{0}'")]
pub struct ParseColorError(pub String);
