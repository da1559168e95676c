//! Vendor session service.
//!
//! Exchanges credentials for a bearer token, decodes the token's role claim
//! locally (no extra network round trip), and persists the session only
//! when the claim passes the vendor gate. A token failing the gate is never
//! persisted, and a failed login never clobbers an existing valid session.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use serde::Deserialize;

use maplefront_core::{Email, Role};

use crate::error::StoreError;
use crate::persist::{PersistencePort, keys};
use crate::remote::{ApiError, StorefrontApi};

/// Claims carried in a vendor token's payload segment.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Permission class of the bearer.
    role: String,
    /// Expiry as a unix timestamp, when the issuer sets one.
    #[serde(default)]
    exp: Option<i64>,
}

impl Claims {
    fn is_expired(&self) -> bool {
        self.exp
            .is_some_and(|exp| chrono::Utc::now().timestamp() >= exp)
    }
}

/// Decode the payload segment of a JWT-shaped token.
///
/// Only the claims are read; signature verification is the issuer's
/// concern, the client just routes on the embedded role.
fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Vendor authentication state.
pub struct VendorSession<A> {
    remote: A,
    persist: Arc<dyn PersistencePort>,
}

impl<A: StorefrontApi> VendorSession<A> {
    /// Create a session service over the given collaborator and
    /// session-scoped persistence.
    pub fn new(remote: A, persist: Arc<dyn PersistencePort>) -> Self {
        Self { remote, persist }
    }

    /// Log in as a vendor.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for a malformed email
    /// - [`StoreError::Network`] when the collaborator is unreachable
    /// - [`StoreError::Authentication`] when the collaborator rejects the
    ///   credentials or the token cannot be decoded
    /// - [`StoreError::Authorization`] when the role claim is not the
    ///   vendor role; the token is discarded and any previously persisted
    ///   session is left untouched
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Role, StoreError> {
        let email = Email::parse(email).map_err(|e| StoreError::Validation(e.to_string()))?;

        let token = match self.remote.vendor_login(&email, password).await {
            Ok(token) => token,
            Err(ApiError::Status { status, message }) => {
                return Err(StoreError::Authentication(message.unwrap_or_else(|| {
                    format!("login rejected (HTTP {status})")
                })));
            }
            Err(e) => return Err(StoreError::Network(e.to_string())),
        };

        let claims = decode_claims(&token)
            .ok_or_else(|| StoreError::Authentication("malformed session token".to_owned()))?;

        if claims.role.parse::<Role>() != Ok(Role::Vendor) {
            return Err(StoreError::Authorization {
                expected: Role::Vendor,
                actual: claims.role,
            });
        }

        // Only a role-checked token is ever persisted.
        if let Err(e) = self.persist.set(keys::VENDOR_TOKEN, &token) {
            tracing::warn!("failed to persist vendor session: {e}");
        }

        Ok(Role::Vendor)
    }

    /// Clear the persisted session unconditionally.
    pub fn logout(&self) {
        if let Err(e) = self.persist.remove(keys::VENDOR_TOKEN) {
            tracing::warn!("failed to clear vendor session: {e}");
        }
    }

    /// Role of the persisted session, or `None` when unauthenticated.
    ///
    /// An absent, malformed, or expired token reads as unauthenticated;
    /// this never errors.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        let token = self.persist.get(keys::VENDOR_TOKEN)?;
        let claims = decode_claims(&token)?;
        if claims.is_expired() {
            return None;
        }
        claims.role.parse().ok()
    }
}
