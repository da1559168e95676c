//! Client-side stores.
//!
//! Each store is a cheaply-cloneable handle over shared inner state, owns
//! exactly one slice of the storefront's client state, and has no UI
//! coupling - rendering layers read snapshots and dispatch operations.

pub mod cart;
pub mod currency;

pub use cart::{CartRemoval, CartStore};
pub use currency::CurrencyStore;
