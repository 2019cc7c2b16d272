//! Error taxonomy for linking and record operations
//!
//! Every variant is a non-retryable logic or precondition failure, except
//! `Store`, which carries the record store's own failure through unchanged.

use chrono::NaiveDate;

use crate::store::StoreError;

/// Errors raised while resolving, binding or persisting linked records
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// A record at `index` carries an empty or whitespace-only natural key.
    ///
    /// Single-record operations (insert or update by one name) report
    /// `index: 0`, treating the name as a one-element list.
    #[error("Invalid natural key at position {index}: key must be non-empty")]
    InvalidKey { index: usize },

    /// The store returned a different number of identifiers than requested.
    #[error("Persistence mismatch: requested {requested} identifiers, store returned {returned}")]
    PersistenceMismatch { requested: usize, returned: usize },

    /// `finalize` met a key with no binding (resolve/bind were skipped).
    #[error("Unresolved natural key: {key}")]
    UnresolvedKey { key: String },

    /// The configured close-date offset moves past the supported date range.
    #[error("Close date out of range: {offset_days} days from {from}")]
    CloseDateOutOfRange { from: NaiveDate, offset_days: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for linking and record operations
pub type LinkResult<T> = Result<T, LinkError>;
