//! Error types for registry operations.

use snafu::Snafu;
use volreg_issuer::IssuerError;
use volreg_store::StoreError;

/// Result type alias for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Errors from volunteer registry operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistryError {
    /// Requested record was not found.
    #[snafu(display("Not found: {entity}"))]
    NotFound {
        /// Description of the missing record.
        entity: String,
    },

    /// Certificates cannot be issued to inactive volunteers.
    #[snafu(display("Volunteer {volunteer_id} is inactive"))]
    VolunteerInactive {
        /// The inactive volunteer.
        volunteer_id: String,
    },

    /// ID issuance failed; store failures pass through uninterpreted.
    #[snafu(transparent)]
    Issuer {
        /// The issuer error, unchanged.
        source: IssuerError,
    },

    /// A store read, write, or record codec operation failed.
    #[snafu(transparent)]
    Store {
        /// The store error, unchanged.
        source: StoreError,
    },
}
