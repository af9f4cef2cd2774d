//! Error types for the volreg document store.

use snafu::Snafu;

use crate::document::DocumentKey;

/// Result type alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors that can occur during store operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// The store cannot be reached at all.
    #[snafu(display("Store unavailable: {message}"))]
    Unavailable {
        /// Description of the connectivity failure.
        message: String,
    },

    /// A transactional commit could not be applied within the retry budget.
    #[snafu(display("Transaction failed after {attempts} attempts: {last_conflict}"))]
    TransactionFailed {
        /// Number of commit attempts made.
        attempts: u32,
        /// The last conflict observed before giving up.
        last_conflict: String,
    },

    /// A concurrent writer committed to a document this transaction read.
    ///
    /// Retryable; normally consumed by the store's commit retry loop.
    #[snafu(display("Write conflict on {key}"))]
    Conflict {
        /// The document whose observed version changed.
        key: DocumentKey,
    },

    /// The transaction closure gave up. Never retried.
    #[snafu(display("Transaction aborted: {message}"))]
    Aborted {
        /// Reason the closure aborted.
        message: String,
    },

    /// Document fields could not be serialized or deserialized.
    #[snafu(display("Serialization error: {source}"))]
    Serialization {
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// A record did not map to a JSON object.
    #[snafu(display("Invalid document: {message}"))]
    InvalidDocument {
        /// What was wrong with the record shape.
        message: String,
    },
}

impl StoreError {
    /// Whether the commit loop may retry after this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
