use crate::core::record::ClassRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Registry encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Registry file could not be replaced: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("No class at index {index} (registry holds {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Shared store of offered classes.
///
/// Every operation is a full read-modify-write with no locking: two callers
/// mutating at the same time race and the last writer wins.
pub trait RegistryStore: Send + Sync {
    /// Never fails; anything unreadable counts as an empty registry.
    fn load_all(&self) -> Vec<ClassRecord>;

    fn save_all(&self, records: &[ClassRecord]) -> Result<(), RegistryError>;

    fn append(&self, record: ClassRecord) -> Result<(), RegistryError> {
        let mut records = self.load_all();
        records.push(record);
        self.save_all(&records)
    }

    fn remove_at(&self, index: usize) -> Result<ClassRecord, RegistryError> {
        let mut records = self.load_all();
        if index >= records.len() {
            return Err(RegistryError::OutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        self.save_all(&records)?;
        Ok(removed)
    }
}

/// Registry kept as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl RegistryStore for JsonFileRegistry {
    fn load_all(&self) -> Vec<ClassRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read registry {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "Registry {} is malformed, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save_all(&self, records: &[ClassRecord]) -> Result<(), RegistryError> {
        let mut tmp = NamedTempFile::new_in(self.directory())?;
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        log::debug!("Saved {} classes to {}", records.len(), self.path.display());
        Ok(())
    }
}
