//! Integration tests for the cart store.
//!
//! Snapshot replacement, refresh coalescing, and issue-order application,
//! all driven against the in-process collaborator double.

use maplefront_core::CartItemId;
use maplefront_integration_tests::{FakeStorefront, cart_item};
use maplefront_storefront::StoreError;
use maplefront_storefront::store::CartStore;

// ============================================================================
// Snapshot Replacement
// ============================================================================

#[tokio::test]
async fn test_refresh_replaces_snapshot_wholesale() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![
        cart_item("1", "Shirt", "20.00", 1),
        cart_item("2", "Hat", "15.00", 2),
    ]);

    let store = CartStore::new(remote.clone());
    assert!(store.items().is_empty());

    store.refresh().await.expect("refresh");
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.item_count(), 3);

    // Server-side change shows up only through the next refresh
    remote.seed_items(vec![cart_item("2", "Hat", "15.00", 2)]);
    assert_eq!(store.items().len(), 2);

    store.refresh().await.expect("refresh");
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].id.as_str(), "2");
}

#[tokio::test]
async fn test_failed_refresh_leaves_previous_snapshot() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");
    assert_eq!(store.items().len(), 1);

    remote.fail_next_list(503, None);
    let err = store.refresh().await.expect_err("refresh should fail");
    assert!(matches!(err, StoreError::Network(_)));

    // The UI must never see a partially-updated or corrupted list
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].name, "Shirt");
}

// ============================================================================
// The Removal Scenario
// ============================================================================

#[tokio::test]
async fn test_remove_item_confirm_then_empty_snapshot() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    let flow = store.remove_item(&CartItemId::new("1")).await;
    let request = flow.request().expect("awaiting confirmation");
    assert_eq!(request.target, "1");
    assert_eq!(request.summary.expect("fresh summary").name, "Shirt");

    let outcome = flow.confirm().await;
    assert!(outcome.committed());

    assert_eq!(remote.delete_calls(), 1);
    assert!(store.items().is_empty());
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_empties_snapshot() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    store.checkout().await.expect("checkout");
    assert_eq!(remote.clear_calls(), 1);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_checkout_failure_is_surfaced_and_snapshot_kept() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    remote.fail_next_clear(502, Some("upstream unavailable"));
    let err = store.checkout().await.expect_err("checkout should fail");
    assert!(matches!(err, StoreError::Network(_)));

    // No automatic retry; the user retries manually against intact state
    assert_eq!(store.items().len(), 1);
    assert_eq!(remote.clear_calls(), 1);
}

// ============================================================================
// Coalescing & Ordering
// ============================================================================

#[tokio::test]
async fn test_concurrent_refreshes_coalesce_into_one_call() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);
    remote.hold_lists();

    let store = CartStore::new(remote.clone());

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.refresh().await }
    });

    // Wait until the first refresh is on the wire
    while remote.list_calls() == 0 {
        tokio::task::yield_now().await;
    }

    let second = tokio::spawn({
        let store = store.clone();
        async move { store.refresh().await }
    });

    // Give the second refresh every chance to (incorrectly) issue a call
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(remote.list_calls(), 1);

    remote.release_list();
    first.await.expect("join").expect("refresh");
    second.await.expect("join").expect("refresh");

    // The joiner shared the in-flight result instead of dialing again
    assert_eq!(remote.list_calls(), 1);
    assert_eq!(store.items().len(), 1);
}

#[tokio::test]
async fn test_stale_refresh_result_never_overwrites_newer_state() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);
    remote.hold_lists();

    let store = CartStore::new(remote.clone());

    // A refresh goes out and captures the pre-checkout cart, then stalls
    let stale = tokio::spawn({
        let store = store.clone();
        async move { store.refresh().await }
    });
    while remote.list_calls() == 0 {
        tokio::task::yield_now().await;
    }

    // Checkout settles first
    store.checkout().await.expect("checkout");
    assert!(store.items().is_empty());

    // The superseded refresh still completes; its result is discarded
    remote.release_list();
    stale.await.expect("join").expect("refresh");
    assert!(store.items().is_empty());
}
