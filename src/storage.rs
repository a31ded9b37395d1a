//! Draft persistence
//!
//! Drafts live in a small key-value store, the terminal counterpart of a
//! browser's local storage. [`DraftStore`] is the only component that talks
//! to it, and it never lets a storage failure escape: failures are logged and
//! reported as `false` or `None`, and the session carries on in memory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::form_state::FormState;

/// Key of the draft record
pub const DRAFT_KEY: &str = "registrationFormData";

/// Key of the saved language preference
pub const LANGUAGE_KEY: &str = "preferredLanguage";

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(StorageError::Unavailable(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write to a temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&temp_path, &path).map_err(io_err)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory store. A store built with [`MemoryStore::unavailable`] fails
/// every call, like storage disabled by the user.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable("storage is disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Persistence adapter for the whole form state
#[derive(Debug)]
pub struct DraftStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Write the state as one record. Returns `false` on any failure.
    pub fn save(&mut self, state: &FormState) -> bool {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize draft: {}", e);
                return false;
            }
        };

        match self.store.set(DRAFT_KEY, &json) {
            Ok(()) => {
                debug!(
                    "Draft saved (step {}, {} fields)",
                    state.current_step,
                    state.fields.len()
                );
                true
            }
            Err(e) => {
                error!("Failed to save draft: {}", e);
                false
            }
        }
    }

    /// Read the stored state. Missing, unreadable and corrupt records all
    /// yield `None`.
    pub fn load(&self) -> Option<FormState> {
        let raw = match self.store.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to read draft: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<FormState>(&raw) {
            Ok(state) => Some(state),
            Err(source) => {
                let e = StorageError::Json {
                    key: DRAFT_KEY.to_string(),
                    source,
                };
                warn!("Discarding unreadable draft: {}", e);
                None
            }
        }
    }

    /// Remove the stored draft. Returns `false` on failure.
    pub fn clear(&mut self) -> bool {
        match self.store.remove(DRAFT_KEY) {
            Ok(()) => {
                debug!("Draft cleared");
                true
            }
            Err(e) => {
                error!("Failed to clear draft: {}", e);
                false
            }
        }
    }

    /// A stored draft exists and records at least one field
    pub fn has_unsaved_data(&self) -> bool {
        self.load().is_some_and(|state| !state.fields.is_empty())
    }
}
