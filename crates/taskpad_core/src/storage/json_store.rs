use crate::error::AppError;
use crate::model::Task;
use crate::storage::{StoreEntry, TaskStore};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKPAD_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntries {
    schema_version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Task>,
}

/// File-backed key-value store holding the whole map in one JSON document.
///
/// Every operation reloads the document from disk before acting, so two
/// sessions against the same path see last-writer-wins semantics rather than
/// a stale in-process cache.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskpad").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskpad")
            .join(STORE_FILE_NAME))
    }
}

impl JsonFileStore {
    /// Opens the store at the path resolved from `TASKPAD_STORE_PATH` or the
    /// platform config directory.
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::at_path(store_path()?))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Task>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|err| AppError::io(err.to_string()))?;
        let stored: StoredEntries =
            serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

        if stored.schema_version != SCHEMA_VERSION {
            return Err(AppError::invalid_data("schema_version mismatch"));
        }

        Ok(stored.entries)
    }

    fn save(&self, entries: &BTreeMap<String, Task>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
        }

        let stored = StoredEntries {
            schema_version: SCHEMA_VERSION,
            entries: entries.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| AppError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        Ok(())
    }
}

impl TaskStore for JsonFileStore {
    fn get_with_prefix(&self, prefix: &str) -> Result<Vec<StoreEntry>, AppError> {
        let entries: Vec<StoreEntry> = self
            .load()?
            .into_iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| StoreEntry { key, value })
            .collect();
        debug!("scanned {} entries under prefix {prefix:?}", entries.len());
        Ok(entries)
    }

    fn set(&mut self, key: &str, value: &Task, overwrite: bool) -> Result<(), AppError> {
        let mut entries = self.load()?;
        if !overwrite && entries.contains_key(key) {
            return Err(AppError::conflict(format!("key already exists: {key}")));
        }
        entries.insert(key.to_string(), value.clone());
        self.save(&entries)?;
        debug!("wrote entry {key} (overwrite={overwrite})");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), AppError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Err(AppError::invalid_input(format!("key not found: {key}")));
        }
        self.save(&entries)?;
        debug!("removed entry {key}");
        Ok(())
    }
}
