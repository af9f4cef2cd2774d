//! volreg-issuer: sequential, human-readable ID issuance.
//!
//! Produces identifiers like `VOL-000042`: globally unique, monotonically
//! increasing per namespace, and safe under concurrent callers. Each
//! namespace is backed by one counter document in the store's `counters`
//! collection; issuance is a single atomic read-increment-write through
//! [`DocumentStore::run_transaction`](volreg_store::DocumentStore::run_transaction),
//! so no two issuances — concurrent or sequential, in-process or across
//! independent processes — ever observe the same value.
//!
//! The numeric suffix is zero-padded to six digits by default and simply
//! grows wider past `999999`; overflowing the pad is a formatting
//! degradation, never an error.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use volreg_issuer::SequentialIdIssuer;
//! use volreg_store::MemoryStore;
//!
//! # async fn example() -> volreg_issuer::Result<()> {
//! let issuer = SequentialIdIssuer::new(Arc::new(MemoryStore::new()));
//!
//! let first = issuer.issue("volunteers", "VOL").await?;
//! assert_eq!(first.as_str(), "VOL-000001");
//!
//! let second = issuer.issue("volunteers", "VOL").await?;
//! assert_eq!(second.value(), 2);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod id;
pub mod issuer;

// Re-export commonly used types
pub use config::{COUNTERS_COLLECTION, ConfigError, DEFAULT_PAD_WIDTH, NamespaceConfig};
pub use error::{IssuerError, Result};
pub use id::IssuedId;
pub use issuer::SequentialIdIssuer;
