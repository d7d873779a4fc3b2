//! In-process store

use crate::backend::{StorageBackend, StorageError};
use std::collections::HashMap;

/// In-memory key/value store.
///
/// Availability, capacity and write rejection can be toggled, which makes it
/// a stand-in for either tier when a host has no durable storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    values: HashMap<String, String>,
    available: bool,
    capacity: Option<usize>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: HashMap::new(),
            available: true,
            capacity: None,
            reject_writes: false,
        }
    }

    /// Limit the size of a single value
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Mark the store as unavailable (fails the capability check)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Keep reporting as available but fail every write
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Seed a raw value
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn max_value_len(&self) -> Option<usize> {
        self.capacity
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable(self.name.clone()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable(self.name.clone()));
        }
        if self.reject_writes {
            return Err(StorageError::Rejected(self.name.clone()));
        }
        if let Some(limit) = self.capacity {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    backend: self.name.clone(),
                    key: key.to_string(),
                    len: value.len(),
                    limit,
                });
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}
