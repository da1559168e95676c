//! Display currency preference store.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;

use maplefront_core::CurrencyCode;

use crate::error::StoreError;
use crate::persist::{PersistencePort, keys};

/// Store holding the active display currency.
///
/// The in-memory value is updated synchronously so dependent UI re-renders
/// immediately; the persistence write that follows is advisory - if it
/// fails, the in-memory value stays authoritative for the rest of the
/// process lifetime.
#[derive(Clone)]
pub struct CurrencyStore {
    inner: Arc<CurrencyInner>,
}

struct CurrencyInner {
    active: Mutex<CurrencyCode>,
    persist: Arc<dyn PersistencePort>,
}

impl CurrencyStore {
    /// Create a store, restoring the persisted preference.
    ///
    /// A missing or unrecognized persisted value falls back to the default
    /// currency.
    #[must_use]
    pub fn new(persist: Arc<dyn PersistencePort>) -> Self {
        let active = persist
            .get(keys::DISPLAY_CURRENCY)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default();

        Self {
            inner: Arc::new(CurrencyInner {
                active: Mutex::new(active),
                persist,
            }),
        }
    }

    /// The active display currency. Never blocks, never touches the
    /// persistence port.
    #[must_use]
    pub fn current(&self) -> CurrencyCode {
        *self.lock()
    }

    /// Set the active display currency.
    ///
    /// Idempotent; repeated calls have no effect beyond the last write
    /// winning.
    pub fn set(&self, code: CurrencyCode) -> CurrencyCode {
        *self.lock() = code;

        if let Err(e) = self.inner.persist.set(keys::DISPLAY_CURRENCY, code.code()) {
            tracing::warn!("failed to persist currency preference: {e}");
        }

        code
    }

    /// Set the active display currency from an untrusted code string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a code outside the supported
    /// set; the active currency is left unchanged.
    pub fn set_code(&self, code: &str) -> Result<CurrencyCode, StoreError> {
        let parsed = code
            .parse::<CurrencyCode>()
            .map_err(StoreError::Validation)?;
        Ok(self.set(parsed))
    }

    /// Flip between the two supported currencies.
    pub fn toggle(&self) -> CurrencyCode {
        self.set(self.current().toggled())
    }

    /// Format a base-unit amount in the active currency.
    #[must_use]
    pub fn format(&self, base_amount: Decimal) -> String {
        self.current().format(base_amount)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CurrencyCode> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryPersistence;

    fn store() -> (CurrencyStore, Arc<MemoryPersistence>) {
        let persist = Arc::new(MemoryPersistence::new());
        let port: Arc<dyn PersistencePort> = persist.clone();
        (CurrencyStore::new(port), persist)
    }

    #[test]
    fn test_set_then_current_agree() {
        let (store, persist) = store();
        store.set(CurrencyCode::CAD);
        assert_eq!(store.current(), CurrencyCode::CAD);
        assert_eq!(
            persist.get(keys::DISPLAY_CURRENCY),
            Some("CAD".to_owned())
        );
    }

    #[test]
    fn test_unknown_code_is_rejected_and_state_unchanged() {
        let (store, _persist) = store();
        let err = store.set_code("EUR").expect_err("EUR is unsupported");
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.current(), CurrencyCode::USD);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let (store, _persist) = store();
        let original = store.current();
        store.toggle();
        store.toggle();
        assert_eq!(store.current(), original);
    }

    #[test]
    fn test_preference_restored_on_construction() {
        let persist = Arc::new(MemoryPersistence::new());
        persist.set(keys::DISPLAY_CURRENCY, "CAD").expect("seed");

        let port: Arc<dyn PersistencePort> = persist.clone();
        let store = CurrencyStore::new(port);
        assert_eq!(store.current(), CurrencyCode::CAD);
    }

    #[test]
    fn test_garbage_preference_falls_back_to_default() {
        let persist = Arc::new(MemoryPersistence::new());
        persist.set(keys::DISPLAY_CURRENCY, "???").expect("seed");

        let store = CurrencyStore::new(persist);
        assert_eq!(store.current(), CurrencyCode::USD);
    }
}
