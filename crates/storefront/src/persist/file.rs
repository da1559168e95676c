//! File-backed persistence for long-lived preferences.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::persist::{PersistError, PersistencePort};

/// Durable key-value store backed by a single JSON file.
///
/// The whole map is rewritten on every mutation; the data is a handful of
/// short preference strings, not a database.
#[derive(Debug)]
pub struct FilePersistence {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FilePersistence {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file is an empty store; it is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl PersistencePort for FilePersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self.lock();
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let mut entries = self.lock();
        entries.remove(key);
        self.flush(&entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store_path() -> PathBuf {
        let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "maplefront-persist-test-{}-{n}",
            std::process::id()
        ))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_store_path().join("preferences.json");

        let store = FilePersistence::open(&path).expect("open");
        store.set("display_currency", "CAD").expect("set");
        drop(store);

        let reopened = FilePersistence::open(&path).expect("reopen");
        assert_eq!(
            reopened.get("display_currency"),
            Some("CAD".to_owned())
        );

        reopened.remove("display_currency").expect("remove");
        drop(reopened);

        let again = FilePersistence::open(&path).expect("open again");
        assert_eq!(again.get("display_currency"), None);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_store_path().join("never-written.json");
        let store = FilePersistence::open(&path).expect("open");
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_store_path().join("corrupt.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "not json").expect("write");

        assert!(matches!(
            FilePersistence::open(&path),
            Err(PersistError::Serialize(_))
        ));
    }
}
