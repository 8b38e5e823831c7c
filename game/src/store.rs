//! Key/value persistence for save records.
//!
//! A [`SaveStore`] moves opaque record bytes in and out of storage and
//! nothing more; what the bytes mean is the records module's business.
//! The file-backed store writes one `<key>.caster` file per record.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

/// Save files keep the historical extension.
const EXTENSION: &str = "caster";

/// Errors from the persistence layer.
#[derive(Debug)]
pub enum StoreError {
    /// No record exists under the key. Recoverable; callers that have a
    /// sensible default fall back to it.
    Missing { key: String },
    /// The record's version byte is not one this build understands.
    UnsupportedVersion { found: u8 },
    /// The record bytes failed to decode.
    Corrupt,
    /// Underlying filesystem failure.
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Missing { key } => write!(f, "no record under key '{key}'"),
            StoreError::UnsupportedVersion { found } => {
                write!(f, "unsupported record version {found}")
            }
            StoreError::Corrupt => write!(f, "record bytes failed to decode"),
            StoreError::Io(err) => write!(f, "storage i/o failed: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Round-trip-safe storage of record bytes under string keys.
pub trait SaveStore {
    fn save(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()>;
    fn load(&self, key: &str) -> StoreResult<Vec<u8>>;
    fn exists(&self, key: &str) -> bool;
    fn delete(&mut self, key: &str) -> StoreResult<()>;
}

/// File-backed store: one file per record under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }
}

impl SaveStore for FileStore {
    fn save(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path(key), bytes)?;
        debug!("saved {} bytes under '{}'", bytes.len(), key);
        Ok(())
    }

    fn load(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.path(key);
        if !path.exists() {
            return Err(StoreError::Missing {
                key: key.to_string(),
            });
        }
        Ok(fs::read(path)?)
    }

    fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
            debug!("deleted record '{}'", key);
        }
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.records.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::Missing {
                key: key.to_string(),
            })
    }

    fn exists(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.records.remove(key);
        Ok(())
    }
}
