//! Maplefront storefront state core.
//!
//! The client-side state that must stay consistent across asynchronous
//! network operations: the cart snapshot, the display-currency preference,
//! the email-verification attempt, and the vendor session. Everything else
//! in the storefront is presentation; this crate owns no markup and no
//! routing.
//!
//! # Architecture
//!
//! - The remote API is an external collaborator reached over HTTP. Its
//!   contract lives in [`remote::StorefrontApi`]; the reqwest-backed
//!   [`remote::StorefrontClient`] implements it, and tests substitute
//!   in-memory doubles.
//! - Durable preferences go through [`persist::PersistencePort`], injected
//!   into each store so instances stay isolated and testable.
//! - Destructive deletes are guarded by the confirmation machine from
//!   `maplefront-core`, bound here to cart items.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - The reportable error taxonomy surfaced to the UI boundary
//! - [`persist`] - Key-value persistence port and implementations
//! - [`remote`] - Collaborator contract and HTTP client
//! - [`store`] - Cart and currency stores
//! - [`services`] - Vendor session and email verification flows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod persist;
pub mod remote;
pub mod services;
pub mod store;

pub use config::{ConfigError, StorefrontConfig};
pub use error::StoreError;
