//! Sequential ID issuance over the transactional document store.
//!
//! One counter document per namespace lives in the counters collection;
//! its `value` field is the count of identifiers issued so far. Every
//! issuance is a single atomic read-increment-write, so uniqueness and
//! monotonicity follow from the store's transaction isolation rather
//! than from any in-process state — they hold across arbitrarily many
//! independent caller processes.

use std::sync::Arc;

use snafu::ensure;
use volreg_store::{DocumentKey, DocumentStore, Fields};

use crate::{
    config::{COUNTERS_COLLECTION, DEFAULT_PAD_WIDTH, NamespaceConfig},
    error::{EmptyNamespaceSnafu, EmptyPrefixSnafu, Result},
    id::IssuedId,
};

/// Field of the counter document holding the issued count.
const VALUE_FIELD: &str = "value";

/// Issues globally unique, monotonically increasing, human-readable
/// identifiers backed by shared counter documents.
///
/// Cheap to clone; clones share the same backing store.
pub struct SequentialIdIssuer<S> {
    store: Arc<S>,
    collection: String,
}

impl<S> Clone for SequentialIdIssuer<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collection: self.collection.clone() }
    }
}

impl<S: DocumentStore> SequentialIdIssuer<S> {
    /// Creates an issuer over the default `counters` collection.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_collection(store, COUNTERS_COLLECTION)
    }

    /// Creates an issuer with a custom counters collection.
    pub fn with_collection(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self { store, collection: collection.into() }
    }

    /// Issues the next identifier in `namespace`, formatted as
    /// `<prefix>-<value>` with the default six-digit pad.
    ///
    /// An absent counter starts at 0, so the first issuance in a
    /// namespace returns 1. The returned value is strictly greater than
    /// any previously committed value for the namespace, even under
    /// concurrent callers.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::EmptyNamespace`](crate::IssuerError::EmptyNamespace)
    /// or [`IssuerError::EmptyPrefix`](crate::IssuerError::EmptyPrefix) on
    /// invalid input. Store failures — `TransactionFailed` once the
    /// store's retry budget is exhausted, `Unavailable` on connectivity
    /// loss — propagate unchanged.
    pub async fn issue(&self, namespace: &str, prefix: &str) -> Result<IssuedId> {
        self.issue_padded(namespace, prefix, DEFAULT_PAD_WIDTH).await
    }

    /// Issues using a validated [`NamespaceConfig`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`issue`](Self::issue).
    pub async fn issue_with(&self, config: &NamespaceConfig) -> Result<IssuedId> {
        self.issue_padded(&config.namespace, &config.prefix, config.pad_width).await
    }

    async fn issue_padded(
        &self,
        namespace: &str,
        prefix: &str,
        pad_width: usize,
    ) -> Result<IssuedId> {
        ensure!(!namespace.is_empty(), EmptyNamespaceSnafu);
        ensure!(!prefix.is_empty(), EmptyPrefixSnafu);

        let key = DocumentKey::new(self.collection.clone(), namespace);
        let next = self
            .store
            .run_transaction(|tx| {
                // Absent counters and non-numeric values both read as 0,
                // so the first issuance in a namespace returns 1.
                let current =
                    tx.get(&key)?.and_then(|doc| doc.get_u64(VALUE_FIELD)).unwrap_or(0);
                let next = current + 1;
                let mut fields = Fields::new();
                fields.insert(VALUE_FIELD.to_string(), next.into());
                tx.set(&key, fields, true);
                Ok(next)
            })
            .await?;

        tracing::debug!(namespace, value = next, "issued sequential id");
        Ok(IssuedId::new(prefix, next, pad_width))
    }
}

#[cfg(test)]
mod tests {
    use volreg_store::MemoryStore;

    use super::*;
    use crate::error::IssuerError;

    fn create_test_issuer() -> SequentialIdIssuer<MemoryStore> {
        SequentialIdIssuer::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn fresh_namespace_starts_at_one() {
        let issuer = create_test_issuer();
        let id = issuer.issue("volunteers", "VOL").await.unwrap();
        assert_eq!(id.value(), 1);
        assert_eq!(id.as_str(), "VOL-000001");
    }

    #[tokio::test]
    async fn empty_namespace_is_rejected() {
        let issuer = create_test_issuer();
        let err = issuer.issue("", "VOL").await.unwrap_err();
        assert!(matches!(err, IssuerError::EmptyNamespace));
    }

    #[tokio::test]
    async fn empty_prefix_is_rejected() {
        let issuer = create_test_issuer();
        let err = issuer.issue("volunteers", "").await.unwrap_err();
        assert!(matches!(err, IssuerError::EmptyPrefix));
    }

    #[tokio::test]
    async fn issue_with_honors_pad_width() {
        let issuer = create_test_issuer();
        let config = NamespaceConfig::builder()
            .namespace("requests".to_string())
            .prefix("REQ".to_string())
            .pad_width(4)
            .build()
            .unwrap();

        let id = issuer.issue_with(&config).await.unwrap();
        assert_eq!(id.as_str(), "REQ-0001");
    }
}
