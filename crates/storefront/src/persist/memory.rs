//! In-memory persistence for session-scoped data.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::persist::{PersistError, PersistencePort};

/// Process-lifetime key-value store.
///
/// Used for session-scoped keys (the vendor token) and as a test double for
/// the durable stores.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistencePort for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.lock().remove(key);
        Ok(())
    }
}
