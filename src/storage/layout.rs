use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// The three files a storage location is made of: the SQLite database, the
/// serialized schema, and the writer lock file.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
    pub db_path: PathBuf,
    pub schema_path: PathBuf,
    pub lock_path: PathBuf,
}

impl StorageLayout {
    fn at(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        StorageLayout {
            db_path: base_dir.join("storage.db"),
            schema_path: base_dir.join("schema.json"),
            lock_path: base_dir.join("writer.lock"),
            base_dir,
        }
    }

    /// Lay out a new storage location, failing if one already exists there.
    pub fn create(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let layout = StorageLayout::at(base_dir);
        if layout.db_path.exists() {
            return Err(Error::DuplicateStorage(layout.base_dir.clone()));
        }
        fs::create_dir_all(&layout.base_dir)?;
        Ok(layout)
    }

    /// Open an existing storage location, failing if it can't be found.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let layout = StorageLayout::at(base_dir);
        if !layout.db_path.exists() {
            return Err(Error::StorageNotFound(layout.base_dir.clone()));
        }
        Ok(layout)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
