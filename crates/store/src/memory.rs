//! In-memory document store.
//!
//! Reference implementation of [`DocumentStore`] using versioned
//! optimistic concurrency: transactions record the version of every
//! document they read, and the commit validates those versions under a
//! single write lock before applying the staged writes. Conflicts re-run
//! the transaction closure with jittered exponential backoff.
//!
//! Also carries failure injection — rejected commits and simulated
//! connectivity loss — so resilience paths can be exercised in tests
//! without a real backend.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    document::{Document, DocumentKey, Fields},
    error::{ConflictSnafu, Result, TransactionFailedSnafu, UnavailableSnafu},
    retry::{RetryPolicy, apply_jitter},
    store::{DocumentStore, SnapshotRead, StagedWrite, Transaction, Version, apply_write},
};

#[derive(Debug, Default)]
struct Inner {
    docs: HashMap<DocumentKey, Document>,
    /// Per-key version counters. Never removed, so deleting and
    /// recreating a document cannot be mistaken for no change.
    versions: HashMap<DocumentKey, Version>,
}

impl Inner {
    fn version_of(&self, key: &DocumentKey) -> Version {
        self.versions.get(key).copied().unwrap_or(0)
    }

    fn bump_version(&mut self, key: &DocumentKey) {
        *self.versions.entry(key.clone()).or_insert(0) += 1;
    }
}

/// In-memory [`DocumentStore`] with optimistic transactions.
///
/// Thread-safe; clones of an `Arc<MemoryStore>` shared across tasks see
/// one consistent store. Data is lost on drop.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    retry: RetryPolicy,
    /// Commit attempts left to reject with a conflict (test injection).
    injected_conflicts: AtomicU32,
    /// When set, every call fails with `StoreError::Unavailable`.
    unavailable: AtomicBool,
    /// Commit attempts observed, successful or not.
    commit_attempts: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store with the default retry policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_retry_policy(RetryPolicy::default())
    }

    /// Creates an empty store with a custom conflict retry policy.
    #[must_use]
    pub fn with_retry_policy(retry: RetryPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            retry,
            injected_conflicts: AtomicU32::new(0),
            unavailable: AtomicBool::new(false),
            commit_attempts: AtomicU64::new(0),
        }
    }

    /// Rejects the next `count` commit attempts with a write conflict.
    ///
    /// Replaces any previously injected count. Used to simulate
    /// contention from concurrent writers.
    pub fn inject_commit_conflicts(&self, count: u32) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    /// Simulates connectivity loss: while set, every call fails with
    /// [`StoreError::Unavailable`](crate::StoreError::Unavailable).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total commit attempts observed, successful or not.
    #[must_use]
    pub fn commit_attempts(&self) -> u64 {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return UnavailableSnafu { message: "store marked unavailable" }.fail();
        }
        Ok(())
    }

    /// Validates the read set and applies the staged writes atomically.
    fn commit(
        &self,
        reads: &HashMap<DocumentKey, (Version, Option<Document>)>,
        writes: &[(DocumentKey, StagedWrite)],
    ) -> Result<()> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.inner.write();

        // Injected conflicts fire before validation, like a backend
        // reporting contention it detected on its own.
        let injected = self
            .injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            let key = writes
                .first()
                .map(|(key, _)| key.clone())
                .or_else(|| reads.keys().next().cloned())
                .unwrap_or_else(|| DocumentKey::new("_injected", "conflict"));
            return ConflictSnafu { key }.fail();
        }

        for (key, (version, _)) in reads {
            if inner.version_of(key) != *version {
                return ConflictSnafu { key: key.clone() }.fail();
            }
        }

        for (key, write) in writes {
            let existing = inner.docs.get(key).cloned();
            let next = apply_write(existing, write);
            inner.docs.insert(key.clone(), next);
            inner.bump_version(key);
        }

        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRead for MemoryStore {
    fn read(&self, key: &DocumentKey) -> Result<(Version, Option<Document>)> {
        let inner = self.inner.read();
        Ok((inner.version_of(key), inner.docs.get(key).cloned()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>> {
        self.check_available()?;
        Ok(self.inner.read().docs.get(key).cloned())
    }

    async fn set(&self, key: &DocumentKey, fields: Fields, merge: bool) -> Result<()> {
        self.check_available()?;
        let mut inner = self.inner.write();
        let existing = inner.docs.get(key).cloned();
        let next = apply_write(existing, &StagedWrite { fields, merge });
        inner.docs.insert(key.clone(), next);
        inner.bump_version(key);
        Ok(())
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool> {
        self.check_available()?;
        let mut inner = self.inner.write();
        let existed = inner.docs.remove(key).is_some();
        if existed {
            inner.bump_version(key);
        }
        Ok(existed)
    }

    async fn list(&self, collection: &str) -> Result<Vec<(DocumentKey, Document)>> {
        self.check_available()?;
        let inner = self.inner.read();
        let mut out: Vec<_> = inner
            .docs
            .iter()
            .filter(|(key, _)| key.collection == collection)
            .map(|(key, doc)| (key.clone(), doc.clone()))
            .collect();
        out.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        Ok(out)
    }

    async fn run_transaction<R, F>(&self, mut work: F) -> Result<R>
    where
        R: Send,
        F: FnMut(&mut Transaction<'_>) -> Result<R> + Send,
    {
        let mut backoff = self.retry.initial_backoff;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.check_available()?;

            let mut txn = Transaction::new(self);
            let out = work(&mut txn)?;
            let (reads, writes) = txn.into_parts();

            match self.commit(&reads, &writes) {
                Ok(()) => return Ok(out),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let jittered = apply_jitter(backoff, self.retry.jitter);
                    tracing::debug!(
                        attempt,
                        backoff_ms = jittered.as_millis() as u64,
                        error = %err,
                        "retrying transaction after write conflict"
                    );
                    tokio::time::sleep(jittered).await;
                    backoff = self.retry.advance(backoff);
                },
                Err(err) if err.is_retryable() => {
                    return TransactionFailedSnafu {
                        attempts: attempt,
                        last_conflict: err.to_string(),
                    }
                    .fail();
                },
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn counter_fields(value: u64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("value".to_string(), value.into());
        fields
    }

    #[tokio::test]
    async fn set_replace_drops_other_fields() {
        let store = MemoryStore::new();
        let key = DocumentKey::new("volunteers", "VOL-000001");

        let mut fields = counter_fields(1);
        fields.insert("name".to_string(), "A".into());
        store.set(&key, fields, false).await.unwrap();

        store.set(&key, counter_fields(2), false).await.unwrap();
        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.get_u64("value"), Some(2));
        assert_eq!(doc.get("name"), None);
    }

    #[tokio::test]
    async fn set_merge_preserves_other_fields() {
        let store = MemoryStore::new();
        let key = DocumentKey::new("volunteers", "VOL-000001");

        let mut fields = counter_fields(1);
        fields.insert("name".to_string(), "A".into());
        store.set(&key, fields, false).await.unwrap();

        store.set(&key, counter_fields(2), true).await.unwrap();
        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.get_u64("value"), Some(2));
        assert_eq!(doc.get_str("name"), Some("A"));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for id in ["b", "c", "a"] {
            store
                .set(&DocumentKey::new("col", id), counter_fields(1), false)
                .await
                .unwrap();
        }
        store.set(&DocumentKey::new("other", "z"), counter_fields(1), false).await.unwrap();

        let listed = store.list("col").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|(key, _)| key.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn transaction_reads_see_staged_writes() {
        let store = MemoryStore::new();
        let key = DocumentKey::new("counters", "volunteers");

        store
            .run_transaction(|tx| {
                assert!(tx.get(&key)?.is_none());
                tx.set(&key, counter_fields(1), true);
                let staged = tx.get(&key)?.unwrap();
                assert_eq!(staged.get_u64("value"), Some(1));
                Ok(())
            })
            .await
            .unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.get_u64("value"), Some(1));
    }

    #[tokio::test]
    async fn delete_and_recreate_still_conflicts() {
        let store = MemoryStore::new();
        let key = DocumentKey::new("counters", "volunteers");
        store.set(&key, counter_fields(1), false).await.unwrap();

        let mut txn = Transaction::new(&store);
        let _ = txn.get(&key).unwrap();
        txn.set(&key, counter_fields(2), true);

        // Delete and recreate behind the transaction's back.
        store.delete(&key).await.unwrap();
        store.set(&key, counter_fields(9), false).await.unwrap();

        let (reads, writes) = txn.into_parts();
        let err = store.commit(&reads, &writes).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.get_u64("value"), Some(9));
    }

    #[tokio::test]
    async fn closure_errors_abort_without_retry() {
        let store = MemoryStore::new();
        let before = store.commit_attempts();

        let err = store
            .run_transaction::<(), _>(|_tx| {
                crate::error::AbortedSnafu { message: "gave up" }.fail()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Aborted { .. }));
        assert_eq!(store.commit_attempts(), before);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        let key = DocumentKey::new("counters", "volunteers");
        store.set_unavailable(true);

        assert!(matches!(
            store.get(&key).await.unwrap_err(),
            StoreError::Unavailable { .. }
        ));
        assert!(matches!(
            store.run_transaction(|_tx| Ok(())).await.unwrap_err(),
            StoreError::Unavailable { .. }
        ));

        store.set_unavailable(false);
        assert!(store.get(&key).await.unwrap().is_none());
    }
}
