//! Key/value stores backing session persistence.
//!
//! Values are opaque JSON strings; the session layer decides what goes
//! under which key.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AgreementError, Result, StoreError};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// On-disk layout of a [`FileStore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    saved_at: DateTime<Utc>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// JSON file store, rewritten on every change
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    saved_at: Option<DateTime<Utc>>,
}

impl FileStore {
    /// Open a store, starting empty if the file is missing or corrupt
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        match Self::try_open(path) {
            Err(AgreementError::Store(StoreError::Corrupt { path, source })) => {
                warn!(path = %path.display(), error = %source, "Store file is corrupt, starting empty");
                Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                    saved_at: None,
                })
            }
            other => other,
        }
    }

    /// Open a store, failing on a corrupt file
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "Store file not found, starting empty");
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
                saved_at: None,
            });
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let file: StoreFile = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), entries = file.entries.len(), "Opened store file");
        Ok(Self {
            path,
            entries: file.entries,
            saved_at: Some(file.saved_at),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the file was last written, if ever
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    fn save(&mut self) -> Result<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let saved_at = Utc::now();
        let file = StoreFile {
            saved_at,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        self.saved_at = Some(saved_at);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
