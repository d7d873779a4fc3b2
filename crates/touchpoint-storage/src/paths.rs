//! Path resolution for configuration and stored state

use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "TOUCHPOINT_HOME";

/// Resolves standard paths for touchpoint files
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// Resolve `$TOUCHPOINT_HOME`, falling back to `~/.touchpoint`
    pub fn new() -> std::io::Result<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(dir));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::at(home.join(".touchpoint")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get touchpoint.json path
    pub fn config_file(&self) -> PathBuf {
        self.root.join("touchpoint.json")
    }

    /// Directory used by the file store tier
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Cookie jar used by the fallback tier
    pub fn cookie_jar(&self) -> PathBuf {
        self.root.join("cookies.txt")
    }
}
