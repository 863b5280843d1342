//! Durable key-value storage for integer settings
//!
//! [`JsonFileStore`] keeps a flat JSON object on disk and rewrites it through a
//! temporary file so a crash mid-write never leaves a truncated save behind.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Storage failures. Gameplay never sees these; callers degrade to defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("save data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("value for '{0}' is not an integer")]
    NotAnInteger(String),
}

/// A durable store of integer values
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like a missing disk
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            offline: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "store offline").into());
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        self.check_online()?;
        Ok(self.values.get(key).copied())
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        self.check_online()?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        match self.read_map()?.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| StorageError::NotAnInteger(key.to_string())),
        }
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), Value::from(value));
        self.write_map(&map)
    }
}
