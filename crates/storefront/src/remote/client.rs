//! Reqwest-backed implementation of the storefront API contract.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use maplefront_core::{CartItemId, Email};

use crate::config::StorefrontConfig;
use crate::remote::types::{ApiMessage, CartItem, VendorLoginRequest, VendorLoginResponse};
use crate::remote::{ApiError, StorefrontApi};

/// Client for the remote storefront API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl StorefrontClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
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

    /// Check the response status, pulling a server message out of the error
    /// body when one is present.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|body| body.msg);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl StorefrontApi for StorefrontClient {
    #[instrument(skip(self))]
    async fn list_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/cart"))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_cart_item(&self, id: &CartItemId) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.endpoint(&format!("/cart/{id}")))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.endpoint("/cart"))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn vendor_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<String, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/vendor/login"))
            .json(&VendorLoginRequest {
                email: email.as_str(),
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let body: VendorLoginResponse = Self::check(response).await?.json().await?;
        Ok(body.token)
    }

    #[instrument(skip(self, token))]
    async fn verify_email(&self, token: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(&format!("/vendor/verify/{token}")))
            .send()
            .await?;

        let body: ApiMessage = Self::check(response).await?.json().await?;
        Ok(body.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_client(base: &str) -> StorefrontClient {
        let config = StorefrontConfig {
            api_url: Url::parse(base).expect("valid url"),
            state_dir: PathBuf::from(".maplefront"),
            http_timeout: Duration::from_secs(1),
        };
        StorefrontClient::new(&config).expect("client")
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = test_client("https://api.shop.example/");
        assert_eq!(
            client.endpoint("/cart"),
            "https://api.shop.example/cart"
        );
        assert_eq!(
            client.endpoint("/vendor/verify/abc"),
            "https://api.shop.example/vendor/verify/abc"
        );
    }
}
