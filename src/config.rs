//! Configuration for scrollkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, ScrollError};

/// Main configuration for a scrollkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single backing log file.
    /// The file holds nothing but records; there is no index file.
    pub path: PathBuf,

    /// Create missing parent directories of `path` on open
    pub create_dirs: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync every append to the storage medium before `set` returns.
    ///
    /// When false, writes reach the OS but may be lost on abrupt termination
    /// until [`Store::sync`](crate::Store::sync) or `close` is called.
    pub flush_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./scrollkv_data/data.log"),
            create_dirs: true,
            flush_on_write: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ScrollError::Config("log path is empty".to_string()));
        }
        if self.path.is_dir() {
            return Err(ScrollError::Config(format!(
                "log path {} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Sync each append before returning
    pub fn flush_on_write(mut self, enabled: bool) -> Self {
        self.config.flush_on_write = enabled;
        self
    }

    /// Create missing parent directories on open
    pub fn create_dirs(mut self, enabled: bool) -> Self {
        self.config.create_dirs = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
