//! Reportable errors surfaced at the UI boundary.
//!
//! Store-level operations catch collaborator failures, leave their prior
//! state intact, and hand the caller a [`StoreError`] instead of throwing
//! past the UI. The type is cloneable on purpose: a coalesced cart refresh
//! broadcasts one result to every caller that joined it.

use thiserror::Error;

use maplefront_core::Role;

use crate::remote::ApiError;

/// Error taxonomy for the state core.
///
/// No variant is fatal; every failure leaves the core in a valid,
/// previously-reachable state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The collaborator was unreachable or answered with a non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    /// Input was rejected at the boundary (unknown currency code, missing
    /// verification token, malformed email).
    #[error("validation error: {0}")]
    Validation(String),

    /// The collaborator rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The credentials were accepted but the role claim is wrong.
    #[error("authorization failed: expected {expected} role, got {actual}")]
    Authorization {
        /// Role the operation requires.
        expected: Role,
        /// Role claim actually present in the token.
        actual: String,
    },
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        Self::Network(err.to_string())
    }
}
