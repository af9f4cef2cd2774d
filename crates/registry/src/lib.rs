//! volreg-registry: volunteer registry data layer.
//!
//! The store-facing operations behind the volunteer-management admin
//! surface: signup requests and their review lifecycle, volunteer
//! records, and certificate issuance. Every identifier — `REQ-…`,
//! `VOL-…`, `CERT-…` — comes from the sequential issuer, so ids stay
//! unique and gapless no matter how many admin sessions operate on the
//! same store concurrently.
//!
//! Rendering, styling, and authentication live outside this crate; it
//! only reads and writes documents.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use volreg_registry::{NewRequest, RegistryService};
//! use volreg_store::MemoryStore;
//!
//! # async fn example() -> volreg_registry::Result<()> {
//! let registry = RegistryService::new(Arc::new(MemoryStore::new()));
//!
//! let request = registry
//!     .submit_request(NewRequest { name: "Amira".to_string(), ..Default::default() })
//!     .await?;
//! let volunteer = registry.approve_request(&request.request_id).await?;
//! assert_eq!(volunteer.volunteer_id, "VOL-000001");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use error::{RegistryError, Result};
pub use service::{
    CERTIFICATES_COLLECTION, REQUESTS_COLLECTION, RegistryConfig, RegistryService,
    VOLUNTEERS_COLLECTION,
};
pub use types::{
    CertificateRecord, NewRequest, NewVolunteer, RequestStatus, VolunteerRecord, VolunteerRequest,
    VolunteerStatus, VolunteerUpdate,
};
