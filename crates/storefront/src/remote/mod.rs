//! Remote storefront API collaborator.
//!
//! # Architecture
//!
//! - The API's contract is consumed, never implemented, here: a plain REST
//!   surface with JSON bodies
//! - [`StorefrontApi`] is the seam - stores are generic over it so tests
//!   inject in-memory doubles
//! - [`StorefrontClient`] is the reqwest-backed implementation
//!
//! # Example
//!
//! ```rust,ignore
//! use maplefront_storefront::remote::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config)?;
//! let items = client.list_cart().await?;
//! ```

mod client;
pub mod types;

pub use client::StorefrontClient;
pub use types::CartItem;

use secrecy::SecretString;
use thiserror::Error;

use maplefront_core::{CartItemId, Email};

/// Errors that can occur when calling the remote storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
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

impl ApiError {
    /// The server-provided message from an error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Contract of the remote storefront API.
///
/// One collaborator, eight operations; see the repository-level contract
/// table for paths and payloads. Implementations must not retry on their
/// own - retry policy belongs to the flows that own the calls.
pub trait StorefrontApi: Send + Sync {
    /// `GET /cart` - the full cart in server order.
    fn list_cart(&self) -> impl Future<Output = Result<Vec<CartItem>, ApiError>> + Send;

    /// `DELETE /cart/{id}` - remove a single item.
    fn delete_cart_item(
        &self,
        id: &CartItemId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `DELETE /cart` - clear the cart at checkout.
    fn clear_cart(&self) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /vendor/login` - exchange credentials for a bearer token.
    fn vendor_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET /vendor/verify/{token}` - verify an email token.
    ///
    /// `Ok(None)` means the API answered 2xx without a result message;
    /// callers treat that as a failed verification with their fallback
    /// message.
    fn verify_email(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}
