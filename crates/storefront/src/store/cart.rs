//! Cart snapshot store.
//!
//! The cart snapshot is replaced wholesale on every successful fetch and is
//! never patched incrementally, so the local list can never drift from the
//! server's. All mutations go through the collaborator and re-synchronize
//! with a refresh afterwards.
//!
//! # Concurrency
//!
//! - A refresh arriving while one is outstanding joins the in-flight call
//!   instead of issuing a duplicate (watch-channel broadcast).
//! - Every operation that can replace the snapshot takes a monotonically
//!   increasing issue sequence number; results are applied in issue order,
//!   so a superseded call still completes but its result is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::watch;

use maplefront_core::CartItemId;
use maplefront_core::machine::{ConfirmTarget, ConfirmationFlow};

use crate::error::StoreError;
use crate::remote::{CartItem, StorefrontApi};

type RefreshResult = Result<(), StoreError>;

/// Store owning the cart snapshot.
///
/// Cheaply cloneable; all clones share the same snapshot.
pub struct CartStore<A> {
    inner: Arc<CartInner<A>>,
}

impl<A> Clone for CartStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartInner<A> {
    remote: A,
    snapshot: Mutex<Snapshot>,
    issue_seq: AtomicU64,
    in_flight: tokio::sync::Mutex<Option<watch::Receiver<Option<RefreshResult>>>>,
}

#[derive(Default)]
struct Snapshot {
    items: Vec<CartItem>,
    applied_seq: u64,
}

impl<A: StorefrontApi> CartStore<A> {
    /// Create an empty store over the given collaborator.
    pub fn new(remote: A) -> Self {
        Self {
            inner: Arc::new(CartInner {
                remote,
                snapshot: Mutex::new(Snapshot::default()),
                issue_seq: AtomicU64::new(0),
                in_flight: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// The current snapshot, in server order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_snapshot().items.clone()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock_snapshot().items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal in the base unit.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock_snapshot()
            .items
            .iter()
            .map(CartItem::line_total)
            .sum()
    }

    /// Re-fetch the cart and replace the snapshot wholesale.
    ///
    /// On failure the previous snapshot is left untouched; the UI never
    /// sees a partially-updated list. A refresh arriving while another is
    /// outstanding awaits the in-flight call and shares its result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Network`] when the collaborator call fails.
    pub async fn refresh(&self) -> RefreshResult {
        loop {
            let tx = {
                let mut slot = self.inner.in_flight.lock().await;
                if let Some(rx) = slot.as_ref() {
                    let mut rx = rx.clone();
                    drop(slot);
                    if let Some(result) = settled(&mut rx).await {
                        return result;
                    }
                    // The in-flight call vanished without settling (its
                    // task was dropped); clear the stale slot and lead a
                    // fresh one.
                    let mut slot = self.inner.in_flight.lock().await;
                    if slot.as_ref().is_some_and(|stale| stale.same_channel(&rx)) {
                        *slot = None;
                    }
                    continue;
                }
                let (tx, rx) = watch::channel(None);
                *slot = Some(rx);
                tx
            };

            let seq = self.next_seq();
            let result = match self.inner.remote.list_cart().await {
                Ok(items) => {
                    self.apply(seq, items);
                    Ok(())
                }
                Err(e) => Err(StoreError::from(e)),
            };

            *self.inner.in_flight.lock().await = None;
            let _ = tx.send(Some(result.clone()));
            return result;
        }
    }

    /// Begin removing an item: arms a confirmation flow whose commit
    /// deletes the item and re-synchronizes the snapshot.
    ///
    /// Nothing is deleted until the returned flow's `confirm()` runs;
    /// `cancel()` discards the request without any collaborator call.
    pub async fn remove_item(&self, id: &CartItemId) -> ConfirmationFlow<CartRemoval<A>> {
        let flow = ConfirmationFlow::new(CartRemoval {
            store: self.clone(),
        });
        flow.arm(id.as_str()).await;
        flow
    }

    /// Clear the cart at checkout.
    ///
    /// On success the snapshot becomes empty and the caller is expected to
    /// navigate away. There is no automatic retry; a failure is surfaced
    /// and the user may retry manually.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Network`] when the collaborator call fails;
    /// the snapshot is left untouched.
    pub async fn checkout(&self) -> Result<(), StoreError> {
        let seq = self.next_seq();
        self.inner.remote.clear_cart().await?;
        self.apply(seq, Vec::new());
        Ok(())
    }

    fn next_seq(&self) -> u64 {
        self.inner.issue_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the snapshot, unless a later-issued result already landed.
    fn apply(&self, seq: u64, items: Vec<CartItem>) {
        let mut snapshot = self.lock_snapshot();
        if seq < snapshot.applied_seq {
            return;
        }
        snapshot.applied_seq = seq;
        snapshot.items = items;
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wait for an in-flight refresh to publish its result.
async fn settled(
    rx: &mut watch::Receiver<Option<RefreshResult>>,
) -> Option<RefreshResult> {
    loop {
        if let Some(result) = rx.borrow_and_update().clone() {
            return Some(result);
        }
        if rx.changed().await.is_err() {
            return None;
        }
    }
}

/// Confirmation binding for cart-item deletion.
pub struct CartRemoval<A> {
    store: CartStore<A>,
}

impl<A: StorefrontApi> ConfirmTarget for CartRemoval<A> {
    type Summary = CartItem;
    type Error = StoreError;

    /// Preview comes from a fresh fetch, never from the possibly-stale
    /// snapshot.
    async fn fetch_summary(&self, target: &str) -> Result<CartItem, StoreError> {
        let found = match self.store.inner.remote.list_cart().await {
            Ok(items) => items.into_iter().find(|item| item.id.as_str() == target),
            Err(e) => {
                tracing::warn!("cart item preview unavailable: {e}");
                return Err(StoreError::from(e));
            }
        };

        found.ok_or_else(|| {
            tracing::warn!("cart item {target} missing from fresh cart fetch");
            StoreError::Validation(format!("cart item {target} is no longer in the cart"))
        })
    }

    async fn commit(&self, target: &str) -> Result<(), StoreError> {
        let id = CartItemId::new(target);
        self.store.inner.remote.delete_cart_item(&id).await?;
        // The refreshed snapshot, not local arithmetic, is the source of
        // truth after a mutation.
        self.store.refresh().await
    }
}
