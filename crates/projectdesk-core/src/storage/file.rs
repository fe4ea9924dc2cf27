use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Session file name in cache directory
pub const SESSION_FILE: &str = "session.json";

/// Extension given to an unreadable session file when it is set aside
const CORRUPT_EXTENSION: &str = "json.corrupt";

/// Slots persisted as one JSON object on disk.
///
/// The whole object is rewritten on every change; the file is tiny and writes
/// only happen on login, refresh, migration and logout.
pub struct FileStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing slots if the file exists.
    ///
    /// A file that does not parse is moved aside and the store starts empty,
    /// which leaves the user signed out.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let slots = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&contents) {
                    Ok(slots) => slots,
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Session file is corrupt, starting signed out"
                        );
                        set_aside(&path);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), slots = slots.len(), "Session file opened");

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// Open `session.json` inside the given cache directory.
    pub fn in_dir(cache_dir: &Path) -> Result<Self, StorageError> {
        Self::open(cache_dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if slots.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(slots)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

fn set_aside(path: &Path) {
    let target = path.with_extension(CORRUPT_EXTENSION);
    if let Err(e) = std::fs::rename(path, &target) {
        warn!(
            path = %path.display(),
            error = %e,
            "Failed to move corrupt session file aside"
        );
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        self.persist(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        if slots.remove(key).is_some() {
            self.persist(&slots)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::in_dir(dir.path()).expect("open");
        store.set("projectdesk_token", "abc").expect("set");

        let reopened = FileStore::in_dir(dir.path()).expect("reopen");
        assert_eq!(
            reopened.get("projectdesk_token").expect("get").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_removing_last_slot_deletes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::in_dir(dir.path()).expect("open");
        store.set("token", "abc").expect("set");
        assert!(store.path().exists());

        store.remove("token").expect("remove");
        assert!(!store.path().exists());

        // Removing again is a no-op
        store.remove("token").expect("remove twice");
    }

    #[test]
    fn test_empty_file_is_treated_as_no_slots() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SESSION_FILE), "").expect("write");
        let store = FileStore::in_dir(dir.path()).expect("open");
        assert_eq!(store.get("token").expect("get"), None);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, "{not json").expect("write");

        let store = FileStore::in_dir(dir.path()).expect("open");
        assert_eq!(store.get("projectdesk_token").expect("get"), None);
        assert!(!path.exists());
        assert!(dir.path().join("session.json.corrupt").exists());

        // The store is usable again afterwards
        store.set("projectdesk_token", "abc").expect("set");
        let reopened = FileStore::in_dir(dir.path()).expect("reopen");
        assert_eq!(
            reopened.get("projectdesk_token").expect("get").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_wrong_shape_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SESSION_FILE), r#"{"token": 42}"#).expect("write");
        let store = FileStore::in_dir(dir.path()).expect("open");
        assert_eq!(store.get("token").expect("get"), None);
    }
}
