//! Storage backend trait and errors

use thiserror::Error;

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend '{0}' is unavailable")]
    Unavailable(String),

    #[error("value for '{key}' is {len} bytes, backend '{backend}' accepts at most {limit}")]
    QuotaExceeded {
        backend: String,
        key: String,
        len: usize,
        limit: usize,
    },

    #[error("write rejected by backend '{0}'")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no storage backend accepted '{0}'")]
    Exhausted(String),
}

/// A single key/value store
pub trait StorageBackend: Send {
    /// Backend name (used in logs and status output)
    fn name(&self) -> &str;

    /// Whether the backend can currently be written to
    fn is_available(&self) -> bool {
        true
    }

    /// Largest value (in bytes) the backend accepts, `None` when unbounded
    fn max_value_len(&self) -> Option<usize> {
        None
    }

    /// Capability check performed before every write attempt
    fn accepts(&self, value: &str) -> bool {
        self.is_available() && self.max_value_len().map_or(true, |limit| value.len() <= limit)
    }

    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BoundedStore {
        limit: usize,
    }

    impl StorageBackend for BoundedStore {
        fn name(&self) -> &str {
            "bounded"
        }

        fn max_value_len(&self) -> Option<usize> {
            Some(self.limit)
        }

        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_accepts_respects_limit() {
        let store = BoundedStore { limit: 4 };
        assert!(store.is_available());
        assert!(store.accepts("abcd"));
        assert!(!store.accepts("abcde"));
    }

    #[test]
    fn test_quota_error_message() {
        let err = StorageError::QuotaExceeded {
            backend: "cookie".to_string(),
            key: "gktp".to_string(),
            len: 5000,
            limit: 4096,
        };
        assert!(err.to_string().contains("at most 4096"));
    }
}
