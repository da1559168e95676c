//! Admin product catalog and deletion flow.

use std::sync::{Arc, Mutex, PoisonError};

use maplefront_core::ProductId;
use maplefront_core::machine::{ConfirmTarget, ConfirmationFlow};

use crate::remote::{AdminApi, AdminApiError, ProductSummary};

/// Store owning the deletable-product list.
///
/// Cheaply cloneable; all clones share the same snapshot.
pub struct AdminCatalog<A> {
    inner: Arc<CatalogInner<A>>,
}

impl<A> Clone for AdminCatalog<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogInner<A> {
    remote: A,
    products: Mutex<Vec<ProductSummary>>,
}

impl<A: AdminApi> AdminCatalog<A> {
    /// Create an empty catalog over the given collaborator.
    pub fn new(remote: A) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                remote,
                products: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The current product list, in server order.
    #[must_use]
    pub fn products(&self) -> Vec<ProductSummary> {
        self.lock().clone()
    }

    /// Re-fetch the product list and replace it wholesale.
    ///
    /// On failure the previous list is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error when the fetch fails.
    pub async fn refresh(&self) -> Result<(), AdminApiError> {
        let products = self.inner.remote.list_products().await?;
        *self.lock() = products;
        Ok(())
    }

    /// Begin deleting a product: arms a confirmation flow whose commit
    /// deletes the product and re-synchronizes the list.
    ///
    /// The preview summary is fetched fresh; nothing is deleted until the
    /// returned flow's `confirm()` runs.
    pub async fn remove_product(&self, id: &ProductId) -> ConfirmationFlow<ProductRemoval<A>> {
        let flow = ConfirmationFlow::new(ProductRemoval {
            catalog: self.clone(),
        });
        flow.arm(id.as_str()).await;
        flow
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ProductSummary>> {
        self.inner
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Confirmation binding for admin product deletion.
pub struct ProductRemoval<A> {
    catalog: AdminCatalog<A>,
}

impl<A: AdminApi> ConfirmTarget for ProductRemoval<A> {
    type Summary = ProductSummary;
    type Error = AdminApiError;

    async fn fetch_summary(&self, target: &str) -> Result<ProductSummary, AdminApiError> {
        let id = ProductId::new(target);
        match self.catalog.inner.remote.get_product(&id).await {
            Ok(product) => Ok(product),
            Err(e) => {
                tracing::warn!("product preview unavailable: {e}");
                Err(e)
            }
        }
    }

    async fn commit(&self, target: &str) -> Result<(), AdminApiError> {
        let id = ProductId::new(target);
        self.catalog.inner.remote.delete_product(&id).await?;
        self.catalog.refresh().await
    }
}
