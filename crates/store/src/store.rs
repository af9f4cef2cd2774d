//! The document-store boundary and its transaction handle.
//!
//! [`DocumentStore`] is the only surface the rest of the workspace uses
//! to talk to the backing document database. Its transactional
//! read-modify-write is the contract the sequential ID issuer's
//! correctness rests on: the whole closure is retried on write conflict
//! and commits are all-or-nothing.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    document::{Document, DocumentKey, Fields},
    error::Result,
};

/// Version of a document as observed by a transaction.
///
/// Version 0 means the document has never been written. Versions survive
/// deletion, so a delete-then-recreate cannot be mistaken for an
/// unchanged document.
pub type Version = u64;

/// Read access to the current committed state of a store.
///
/// Implementations back [`Transaction`] reads; the transaction records
/// the version returned here and the commit validates it.
pub trait SnapshotRead: Send + Sync {
    /// Reads a document together with its current version.
    fn read(&self, key: &DocumentKey) -> Result<(Version, Option<Document>)>;
}

/// A write staged inside a transaction, applied only at commit.
#[derive(Debug, Clone)]
pub(crate) struct StagedWrite {
    pub(crate) fields: Fields,
    pub(crate) merge: bool,
}

/// Applies a staged write on top of an optional existing document.
pub(crate) fn apply_write(existing: Option<Document>, write: &StagedWrite) -> Document {
    if write.merge {
        let mut doc = existing.unwrap_or_default();
        doc.merge(&write.fields);
        doc
    } else {
        Document::from_fields(write.fields.clone())
    }
}

/// Handle passed to the closure of [`DocumentStore::run_transaction`].
///
/// Reads record the observed version of every document touched and are
/// repeatable within the transaction. Writes are staged and applied only
/// if the commit validates that none of the observed versions changed
/// underneath the transaction.
pub struct Transaction<'a> {
    reader: &'a dyn SnapshotRead,
    reads: HashMap<DocumentKey, (Version, Option<Document>)>,
    writes: Vec<(DocumentKey, StagedWrite)>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(reader: &'a dyn SnapshotRead) -> Self {
        Self { reader, reads: HashMap::new(), writes: Vec::new() }
    }

    /// Reads a document, seeing this transaction's own staged writes.
    ///
    /// The first read of a key fixes the version the commit will
    /// validate; later reads of the same key return the same base state.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the underlying store.
    pub fn get(&mut self, key: &DocumentKey) -> Result<Option<Document>> {
        if !self.reads.contains_key(key) {
            let observed = self.reader.read(key)?;
            self.reads.insert(key.clone(), observed);
        }
        // reads map was just populated for this key
        let mut view = self.reads[key].1.clone();
        for (staged_key, write) in &self.writes {
            if staged_key == key {
                view = Some(apply_write(view.take(), write));
            }
        }
        Ok(view)
    }

    /// Stages a write.
    ///
    /// With `merge`, `fields` are merged into the existing document at
    /// commit; otherwise the document is replaced wholesale.
    pub fn set(&mut self, key: &DocumentKey, fields: Fields, merge: bool) {
        self.writes.push((key.clone(), StagedWrite { fields, merge }));
    }

    /// Splits the transaction into its read set and staged writes.
    pub(crate) fn into_parts(
        self,
    ) -> (HashMap<DocumentKey, (Version, Option<Document>)>, Vec<(DocumentKey, StagedWrite)>) {
        (self.reads, self.writes)
    }
}

/// A transactional document database.
///
/// The reference implementation is [`MemoryStore`](crate::MemoryStore);
/// any backend exposing atomic read-modify-write with conflict retry can
/// implement this trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read outside any transaction.
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>>;

    /// Writes a document.
    ///
    /// With `merge`, `fields` are merged into any existing document at
    /// the top level; otherwise the document is replaced.
    async fn set(&self, key: &DocumentKey, fields: Fields, merge: bool) -> Result<()>;

    /// Deletes a document. Returns whether it existed.
    async fn delete(&self, key: &DocumentKey) -> Result<bool>;

    /// Lists a collection, ordered by document id.
    async fn list(&self, collection: &str) -> Result<Vec<(DocumentKey, Document)>>;

    /// Runs `work` as a single atomic read-modify-write.
    ///
    /// The closure may execute several times: whenever a concurrent
    /// writer invalidates a document this transaction read, the staged
    /// state is discarded and the closure is re-run after a backoff.
    /// Once the store's retry budget is exhausted the call fails with
    /// [`StoreError::TransactionFailed`](crate::StoreError::TransactionFailed).
    /// A failed call leaves every document untouched; no torn state is
    /// ever visible to other callers.
    ///
    /// Errors returned by the closure itself abort the transaction
    /// immediately and are never retried.
    async fn run_transaction<R, F>(&self, work: F) -> Result<R>
    where
        R: Send,
        F: FnMut(&mut Transaction<'_>) -> Result<R> + Send;
}
