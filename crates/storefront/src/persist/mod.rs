//! Key-value persistence for client preferences and sessions.
//!
//! A small durable capability behind one trait so stores can be handed a
//! test double, a file-backed store (long-lived preferences), or an
//! in-memory store (session-scoped data) without caring which. Writes are
//! fire-and-forget from the stores' point of view: a failed write never
//! rolls back an in-memory state change.

mod file;
mod memory;

pub use file::FilePersistence;
pub use memory::MemoryPersistence;

use thiserror::Error;

/// Persistence keys used by the state core.
pub mod keys {
    /// Long-lived key for the display currency preference.
    pub const DISPLAY_CURRENCY: &str = "display_currency";

    /// Session-scoped key for the vendor bearer token.
    pub const VENDOR_TOKEN: &str = "vendor_token";
}

/// Errors that can occur when writing through a persistence port.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file's contents could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A durable key-value store.
///
/// Reads are infallible by contract: an unreadable value is simply absent.
/// Write failures are reported so callers can log them, but callers treat
/// the in-memory value as authoritative for the rest of the process
/// lifetime either way.
pub trait PersistencePort: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be made durable.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Remove the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal could not be made durable.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}
