//! Ordered list of storage backends

use crate::backend::{StorageBackend, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage tiers ordered primary-first.
///
/// Writes walk the tiers primary-first and stop at the first backend that
/// passes its capability check and accepts the value; each tier is tried at
/// most once. Reads walk the tiers in reverse (constrained tier first) so a
/// value that only made it into the fallback is still found.
pub struct TieredStorage {
    backends: Vec<Box<dyn StorageBackend>>,
    fallback_logged: bool,
}

impl TieredStorage {
    pub fn new(backends: Vec<Box<dyn StorageBackend>>) -> Self {
        Self {
            backends,
            fallback_logged: false,
        }
    }

    /// Register another tier after the existing ones
    pub fn push(&mut self, backend: Box<dyn StorageBackend>) {
        self.backends.push(backend);
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn StorageBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Serialize `value` to JSON and store it in the first tier that takes it.
    ///
    /// Returns the name of the backend that accepted the write.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<String, StorageError> {
        let json = serde_json::to_string(value)?;
        self.write_raw(key, &json)
    }

    /// Store a raw string, primary first.
    ///
    /// Each tier is tried at most once, so the usual primary + fallback
    /// setup retries exactly once. A primary that fails its capability
    /// check or its write is reported at warn the first time only.
    pub fn write_raw(&mut self, key: &str, value: &str) -> Result<String, StorageError> {
        for (tier, backend) in self.backends.iter_mut().enumerate() {
            let failure = if !backend.accepts(value) {
                format!("capability check failed ({} bytes)", value.len())
            } else {
                match backend.set(key, value) {
                    Ok(()) => return Ok(backend.name().to_string()),
                    Err(e) => e.to_string(),
                }
            };

            if tier == 0 && !self.fallback_logged {
                tracing::warn!(
                    backend = backend.name(),
                    key,
                    error = %failure,
                    "primary storage rejected write, falling back"
                );
                self.fallback_logged = true;
            } else {
                tracing::debug!(backend = backend.name(), key, error = %failure, "storage write failed");
            }
        }
        Err(StorageError::Exhausted(key.to_string()))
    }

    #[cfg(test)]
    fn fallback_logged(&self) -> bool {
        self.fallback_logged
    }

    /// Read and deserialize the value under `key`, fallback tier first.
    ///
    /// Missing values, backend errors and unparsable values all yield `None`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        for backend in self.backends.iter().rev() {
            let raw = match backend.get(key) {
                Ok(Some(raw)) if !raw.trim().is_empty() => raw,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(backend = backend.name(), key, error = %e, "storage read failed");
                    continue;
                }
            };
            match serde_json::from_str(&raw) {
                Ok(value) => return Some(value),
                Err(e) => {
                    tracing::warn!(backend = backend.name(), key, error = %e, "discarding unparsable stored value");
                }
            }
        }
        None
    }

    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key).unwrap_or_default()
    }

    /// Remove `key` from every tier
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut first_error = None;
        for backend in &mut self.backends {
            if let Err(e) = backend.remove(key) {
                tracing::warn!(backend = backend.name(), key, error = %e, "storage remove failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for TieredStorage {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for TieredStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredStorage")
            .field(
                "backends",
                &self.backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
