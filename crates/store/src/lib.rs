//! volreg-store: transactional document-store boundary for volreg.
//!
//! The volunteer-management surfaces are backed entirely by an external
//! document database; this crate pins down the slice of that database the
//! rest of the workspace relies on:
//!
//! - **Documents**: schemaless JSON field maps addressed by `(collection, id)` keys
//! - **Writes**: merge-or-replace at the top level
//! - **Transactions**: atomic read-modify-write, retried transparently on write conflict,
//!   all-or-nothing visibility
//!
//! [`MemoryStore`] is the reference implementation: versioned optimistic
//! concurrency with a configurable [`RetryPolicy`], plus failure
//! injection for exercising error paths in tests.
//!
//! ## Quick Start
//!
//! ```
//! use volreg_store::{DocumentKey, DocumentStore, Fields, MemoryStore};
//!
//! # async fn example() -> volreg_store::Result<()> {
//! let store = MemoryStore::new();
//! let key = DocumentKey::new("counters", "volunteers");
//!
//! let next = store
//!     .run_transaction(|tx| {
//!         let current = tx.get(&key)?.and_then(|doc| doc.get_u64("value")).unwrap_or(0);
//!         let next = current + 1;
//!         let mut fields = Fields::new();
//!         fields.insert("value".to_string(), next.into());
//!         tx.set(&key, fields, true);
//!         Ok(next)
//!     })
//!     .await?;
//! assert_eq!(next, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod memory;
pub mod retry;
pub mod store;

// Re-export commonly used types
pub use document::{Document, DocumentKey, Fields};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use store::{DocumentStore, SnapshotRead, Transaction, Version};
