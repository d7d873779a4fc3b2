//! Directory-backed store: one JSON document per key

use crate::backend::{StorageBackend, StorageError};
use std::path::{Path, PathBuf};

/// Per-value quota, mirrors what browsers grant local storage
pub const DEFAULT_QUOTA: usize = 5 * 1024 * 1024;

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

/// Rich storage tier
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: usize,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: DEFAULT_QUOTA,
        }
    }

    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

/// Whether `dir` exists as a writable directory, or could be created under
/// its nearest existing ancestor. Nothing is created.
pub(crate) fn is_writable_dir(dir: &Path) -> bool {
    let Some(existing) = dir.ancestors().find(|p| !p.as_os_str().is_empty() && p.exists()) else {
        return false;
    };
    std::fs::metadata(existing)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}

impl StorageBackend for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn is_available(&self) -> bool {
        is_writable_dir(&self.dir)
    }

    fn max_value_len(&self) -> Option<usize> {
        Some(self.quota)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.quota {
            return Err(StorageError::QuotaExceeded {
                backend: self.name().to_string(),
                key: key.to_string(),
                len: value.len(),
                limit: self.quota,
            });
        }
        atomic_write(&self.path_for(key), value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
