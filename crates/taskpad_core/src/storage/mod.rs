use crate::error::AppError;
use crate::model::Task;
use std::collections::BTreeMap;

mod json_store;

pub use json_store::{JsonFileStore, SCHEMA_VERSION, store_path};

/// One persisted record, as returned by a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: String,
    pub value: Task,
}

/// Key-value persistence consumed by the task session.
///
/// Both shipped implementations treat `overwrite = false` as create-only and
/// return a conflict error for an existing key; `overwrite = true` replaces.
/// Deleting an absent key is an error. Prefix scans return entries in
/// ascending key order.
pub trait TaskStore {
    fn get_with_prefix(&self, prefix: &str) -> Result<Vec<StoreEntry>, AppError>;

    fn set(&mut self, key: &str, value: &Task, overwrite: bool) -> Result<(), AppError>;

    fn delete(&mut self, key: &str) -> Result<(), AppError>;
}

/// In-memory store. Backs the test suites; also usable for throwaway
/// sessions that should not touch disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Task> {
        self.entries.get(key)
    }
}

impl TaskStore for MemoryStore {
    fn get_with_prefix(&self, prefix: &str) -> Result<Vec<StoreEntry>, AppError> {
        Ok(self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| StoreEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn set(&mut self, key: &str, value: &Task, overwrite: bool) -> Result<(), AppError> {
        if !overwrite && self.entries.contains_key(key) {
            return Err(AppError::conflict(format!("key already exists: {key}")));
        }
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), AppError> {
        if self.entries.remove(key).is_none() {
            return Err(AppError::invalid_input(format!("key not found: {key}")));
        }
        Ok(())
    }
}
