//! Admin product API collaborator.
//!
//! The admin deletion screens consume three endpoints of the remote API.
//! [`AdminApi`] is the seam tests substitute doubles for; [`AdminClient`]
//! is the reqwest-backed implementation.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use maplefront_core::ProductId;

use crate::config::AdminConfig;

/// Errors that can occur when calling the admin API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed before a status was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("(no message)"))]
    Status {
        /// Status code of the response.
        status: u16,
        /// Server-provided message parsed from the error body, if any.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A product as the admin deletion screens see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Opaque, stable, unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Product image URI.
    #[serde(default)]
    pub image: String,
    /// Unit price in the base unit.
    pub price: Decimal,
}

/// Error envelope used by the admin endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
}

/// Contract of the admin product endpoints.
pub trait AdminApi: Send + Sync {
    /// `GET /admin/delete` - products the admin may delete.
    fn list_products(
        &self,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, AdminApiError>> + Send;

    /// `GET /admin/delete/{id}` - fresh summary for the deletion preview.
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<ProductSummary, AdminApiError>> + Send;

    /// `DELETE /admin/delete/{id}` - delete a product.
    fn delete_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<(), AdminApiError>> + Send;
}

/// Client for the admin product endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Create a new admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AdminConfig) -> Result<Self, AdminApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AdminApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.msg);

        Err(AdminApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl AdminApi for AdminClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<ProductSummary>, AdminApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/admin/delete"))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<ProductSummary, AdminApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(&format!("/admin/delete/{id}")))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), AdminApiError> {
        let response = self
            .inner
            .client
            .delete(self.endpoint(&format!("/admin/delete/{id}")))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_api_error_display() {
        let err = AdminApiError::Status {
            status: 403,
            message: Some("not your product".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 403: not your product");
    }

    #[test]
    fn test_product_summary_deserializes() {
        let json = r#"{"id": "p-1", "name": "Maple Syrup", "price": "12.50"}"#;
        let product: ProductSummary = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id.as_str(), "p-1");
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert_eq!(product.image, "");
    }
}
