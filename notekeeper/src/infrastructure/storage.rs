// src/infrastructure/storage.rs
use crate::application::KeyValueStore;
use crate::domain::ClientError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut guard = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.with_values(|values| values.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.with_values(|values| values.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.with_values(|values| values.remove(key));
        Ok(())
    }
}

/// A JSON object file holding all keys.
///
/// Every write replaces the whole file through a rename, so concurrent
/// processes see either the old or the new contents; the last writer wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> ClientError {
        ClientError::Storage(format!("{action} {}: {err}", self.path.display()))
    }

    fn read(&self) -> Result<Option<String>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.storage_error("Failed to read", e)),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match self.read()? {
            Some(content) => serde_json::from_str(&content)
                .map_err(|e| self.storage_error("Failed to parse", e)),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Contents to rewrite. An unparseable file is dropped; the flag is set
    /// when that happened and the file has to be rewritten regardless.
    fn load_for_update(&self) -> Result<(BTreeMap<String, String>, bool), ClientError> {
        let Some(content) = self.read()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&content) {
            Ok(values) => Ok((values, false)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Store file is corrupt, replacing it");
                Ok((BTreeMap::new(), true))
            }
        }
    }

    #[instrument(level = "trace", skip(self, values))]
    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), ClientError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.storage_error("Failed to create directory for", e))?;

        let json = serde_json::to_string_pretty(values)
            .map_err(|e| self.storage_error("Failed to serialize", e))?;

        // NamedTempFile is created with mode 0600 and the rename keeps it
        let mut file = NamedTempFile::new_in(&dir)
            .map_err(|e| self.storage_error("Failed to create temp file for", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| self.storage_error("Failed to write", e))?;
        file.persist(&self.path)
            .map_err(|e| self.storage_error("Failed to replace", e.error))?;

        debug!(path = %self.path.display(), keys = values.len(), "Saved store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let (mut values, _) = self.load_for_update()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let (mut values, corrupt) = self.load_for_update()?;
        if values.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.save(&values)
    }
}
