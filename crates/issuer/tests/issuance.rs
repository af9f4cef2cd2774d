//! Integration tests for the sequential ID issuer against the memory store.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use volreg_issuer::{IssuerError, SequentialIdIssuer};
use volreg_store::{DocumentKey, DocumentStore, MemoryStore, RetryPolicy, StoreError};

/// Generous budget so genuine contention never exhausts retries in tests.
fn contention_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .with_max_attempts(64)
        .with_initial_backoff(Duration::from_millis(1))
        .with_max_backoff(Duration::from_millis(10))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_issuance_yields_exactly_one_to_n() {
    let store = Arc::new(MemoryStore::with_retry_policy(contention_policy()));
    let issuer = SequentialIdIssuer::new(Arc::clone(&store));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let issuer = issuer.clone();
        handles.push(tokio::spawn(async move {
            issuer.issue("volunteers", "VOL").await.unwrap()
        }));
    }

    let mut values = BTreeSet::new();
    let mut formatted = BTreeSet::new();
    for handle in handles {
        let id = handle.await.unwrap();
        assert!(values.insert(id.value()), "duplicate value {}", id.value());
        assert!(formatted.insert(id.as_str().to_string()));
    }

    // No duplicates and no gaps: exactly {1, ..., 32}.
    let expected: BTreeSet<u64> = (1..=32).collect();
    assert_eq!(values, expected);
}

#[tokio::test]
async fn sequential_issuance_is_strictly_monotonic() {
    let issuer = SequentialIdIssuer::new(Arc::new(MemoryStore::new()));

    let mut previous = 0;
    for _ in 0..10 {
        let id = issuer.issue("volunteers", "VOL").await.unwrap();
        assert!(id.value() > previous);
        previous = id.value();
    }
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let issuer = SequentialIdIssuer::new(Arc::new(MemoryStore::new()));

    for _ in 0..3 {
        issuer.issue("volunteers", "VOL").await.unwrap();
    }
    let cert = issuer.issue("certificates", "CERT").await.unwrap();

    assert_eq!(cert.as_str(), "CERT-000001");
    let vol = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(vol.as_str(), "VOL-000004");
}

#[tokio::test]
async fn injected_conflicts_advance_the_counter_by_exactly_one() {
    let store = Arc::new(MemoryStore::new());
    let issuer = SequentialIdIssuer::new(Arc::clone(&store));

    let first = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(first.value(), 1);

    let attempts_before = store.commit_attempts();
    store.inject_commit_conflicts(3);

    // Default policy allows 5 attempts; 3 rejections then success.
    let second = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(second.value(), 2, "retries must not double-apply the increment");
    assert_eq!(store.commit_attempts() - attempts_before, 4);
}

#[tokio::test]
async fn exhausted_retry_budget_leaves_counter_unchanged() {
    let store = Arc::new(MemoryStore::with_retry_policy(
        RetryPolicy::builder()
            .with_max_attempts(2)
            .with_initial_backoff(Duration::from_millis(1))
            .build(),
    ));
    let issuer = SequentialIdIssuer::new(Arc::clone(&store));

    issuer.issue("volunteers", "VOL").await.unwrap();
    store.inject_commit_conflicts(10);

    let err = issuer.issue("volunteers", "VOL").await.unwrap_err();
    assert!(matches!(
        err,
        IssuerError::Store { source: StoreError::TransactionFailed { attempts: 2, .. } }
    ));

    store.inject_commit_conflicts(0);
    let counter = store
        .get(&DocumentKey::new("counters", "volunteers"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.get_u64("value"), Some(1));

    // The stream resumes where it left off.
    let next = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(next.value(), 2);
}

#[tokio::test]
async fn unavailable_store_never_yields_an_identifier() {
    let store = Arc::new(MemoryStore::new());
    let issuer = SequentialIdIssuer::new(Arc::clone(&store));
    store.set_unavailable(true);

    let err = issuer.issue("volunteers", "VOL").await.unwrap_err();
    assert!(matches!(err, IssuerError::Store { source: StoreError::Unavailable { .. } }));

    store.set_unavailable(false);
    let id = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(id.value(), 1);
}

#[tokio::test]
async fn counter_field_survives_unrelated_merges() {
    let store = Arc::new(MemoryStore::new());
    let issuer = SequentialIdIssuer::new(Arc::clone(&store));

    issuer.issue("volunteers", "VOL").await.unwrap();

    // Another writer annotates the counter document without touching
    // the value field.
    let key = DocumentKey::new("counters", "volunteers");
    let mut fields = volreg_store::Fields::new();
    fields.insert("note".to_string(), "migrated".into());
    store.set(&key, fields, true).await.unwrap();

    let id = issuer.issue("volunteers", "VOL").await.unwrap();
    assert_eq!(id.value(), 2);
    let doc = store.get(&key).await.unwrap().unwrap();
    assert_eq!(doc.get_str("note"), Some("migrated"));
}
