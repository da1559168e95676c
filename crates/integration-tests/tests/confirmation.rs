//! Integration tests for the two-step confirmation protocol.
//!
//! The same machine guards cart-item deletion and admin product deletion;
//! both bindings are exercised here.

use maplefront_admin::catalog::AdminCatalog;
use maplefront_core::{CartItemId, ProductId};
use maplefront_integration_tests::{FakeAdmin, FakeStorefront, cart_item, product};
use maplefront_storefront::store::CartStore;

// ============================================================================
// Cart Binding
// ============================================================================

#[tokio::test]
async fn test_cancel_never_invokes_the_delete() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    let flow = store.remove_item(&CartItemId::new("1")).await;
    assert!(flow.cancel());

    assert_eq!(remote.delete_calls(), 0);
    assert_eq!(store.items().len(), 1);

    // The discarded request is not reusable
    assert!(!flow.confirm().await.committed());
    assert_eq!(remote.delete_calls(), 0);
}

#[tokio::test]
async fn test_repeated_confirm_clicks_commit_once() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    let flow = store.remove_item(&CartItemId::new("1")).await;

    let first = flow.confirm().await;
    let second = flow.confirm().await;
    let third = flow.confirm().await;

    assert!(first.committed());
    assert!(!second.committed());
    assert!(!third.committed());
    assert_eq!(remote.delete_calls(), 1);
}

#[tokio::test]
async fn test_preview_fetch_failure_still_allows_the_delete() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    // The summary fetch (a fresh list) fails; the flow must still arm
    remote.fail_next_list(500, None);
    let flow = store.remove_item(&CartItemId::new("1")).await;

    let request = flow.request().expect("awaiting despite failed preview");
    assert!(request.summary.is_none());

    assert!(flow.confirm().await.committed());
    assert_eq!(remote.delete_calls(), 1);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_failed_commit_still_terminates_the_flow() {
    let remote = FakeStorefront::new();
    remote.seed_items(vec![cart_item("1", "Shirt", "20.00", 1)]);

    let store = CartStore::new(remote.clone());
    store.refresh().await.expect("refresh");

    let flow = store.remove_item(&CartItemId::new("1")).await;

    remote.fail_next_delete(500, Some("delete failed"));
    let outcome = flow.confirm().await;

    // Committed-with-error: the flow terminates and the error is surfaced,
    // matching the optimistic navigate-away behavior
    assert!(outcome.committed());
    match outcome {
        maplefront_core::machine::ConfirmOutcome::Committed { error } => {
            assert!(error.expect("surfaced error").to_string().contains("delete failed"));
        }
        maplefront_core::machine::ConfirmOutcome::Ignored => panic!("commit should have run"),
    }

    assert!(flow.state().is_idle());
    assert_eq!(remote.delete_calls(), 1);
}

// ============================================================================
// Admin Binding
// ============================================================================

#[tokio::test]
async fn test_admin_deletion_follows_the_same_protocol() {
    let remote = FakeAdmin::new();
    remote.seed_products(vec![
        product("p-1", "Maple Syrup", "12.50"),
        product("p-2", "Toque", "22.00"),
    ]);

    let catalog = AdminCatalog::new(remote.clone());
    catalog.refresh().await.expect("refresh");
    assert_eq!(catalog.products().len(), 2);

    let flow = catalog.remove_product(&ProductId::new("p-1")).await;
    let request = flow.request().expect("awaiting confirmation");
    assert_eq!(request.summary.expect("fresh summary").name, "Maple Syrup");

    assert!(flow.confirm().await.committed());
    assert!(!flow.confirm().await.committed());

    assert_eq!(remote.delete_calls(), 1);
    let remaining = catalog.products();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.as_str(), "p-2");
}

#[tokio::test]
async fn test_admin_preview_failure_degrades_to_placeholder() {
    let remote = FakeAdmin::new();
    remote.seed_products(vec![product("p-1", "Maple Syrup", "12.50")]);

    let catalog = AdminCatalog::new(remote.clone());
    remote.fail_next_get(502, None);

    let flow = catalog.remove_product(&ProductId::new("p-1")).await;
    let request = flow.request().expect("awaiting despite failed preview");
    assert!(request.summary.is_none());

    assert!(flow.cancel());
    assert_eq!(remote.delete_calls(), 0);
}
