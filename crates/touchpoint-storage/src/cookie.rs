//! Constrained storage tier backed by a single cookie-jar file

use crate::backend::{StorageBackend, StorageError};
use crate::file::{atomic_write, is_writable_dir};
use std::path::{Path, PathBuf};

/// Maximum size of one `name=value` pair
pub const MAX_COOKIE_LEN: usize = 4096;

/// Cookie jar persisted as `name=value; name2=value2`.
///
/// Values are percent-encoded on write so JSON containing `;` survives.
/// Unencoded values written by other tools are read back verbatim.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<(String, String)>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(parse_cookies(&contents))
    }

    fn save(&self, cookies: &[(String, String)]) -> Result<(), StorageError> {
        let line = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        atomic_write(&self.path, line.as_bytes())?;
        Ok(())
    }
}

/// Split a `document.cookie`-style string into pairs.
///
/// Attributes without a value (`secure`) are skipped, a pair splits at the
/// first `=` only.
pub(crate) fn parse_cookies(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

impl StorageBackend for CookieJar {
    fn name(&self) -> &str {
        "cookie"
    }

    fn is_available(&self) -> bool {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => is_writable_dir(parent),
            _ => true,
        }
    }

    fn max_value_len(&self) -> Option<usize> {
        Some(MAX_COOKIE_LEN)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .load()?
            .into_iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value);

        Ok(value.map(|raw| match urlencoding::decode(&raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw,
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let encoded = urlencoding::encode(value).into_owned();
        let len = key.len() + 1 + encoded.len();
        if len > MAX_COOKIE_LEN {
            return Err(StorageError::QuotaExceeded {
                backend: self.name().to_string(),
                key: key.to_string(),
                len,
                limit: MAX_COOKIE_LEN,
            });
        }

        let mut cookies = self.load()?;
        match cookies.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = encoded,
            None => cookies.push((key.to_string(), encoded)),
        }
        self.save(&cookies)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut cookies = self.load()?;
        let before = cookies.len();
        cookies.retain(|(name, _)| name != key);
        if cookies.len() != before {
            self.save(&cookies)?;
        }
        Ok(())
    }
}
