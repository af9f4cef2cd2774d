//! Error types for sequential ID issuance.

use snafu::Snafu;
use volreg_store::StoreError;

/// Result type alias for issuer operations.
pub type Result<T, E = IssuerError> = std::result::Result<T, E>;

/// Errors surfaced by [`SequentialIdIssuer`](crate::SequentialIdIssuer).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IssuerError {
    /// Namespace must be a non-empty string.
    #[snafu(display("Namespace must be non-empty"))]
    EmptyNamespace,

    /// Prefix must be a non-empty string.
    #[snafu(display("Prefix must be non-empty"))]
    EmptyPrefix,

    /// The backing store failed.
    ///
    /// `TransactionFailed` and `Unavailable` pass through uninterpreted;
    /// the issuer performs no recovery of its own and a failed issuance
    /// never yields a usable identifier.
    #[snafu(transparent)]
    Store {
        /// The store error, unchanged.
        source: StoreError,
    },
}
