//! Store Module
//!
//! The public facade tying the log, the codec and the index together.
//!
//! ## Responsibilities
//! - Run recovery on open so the index matches the log
//! - Write path: encode, append, then point the index at the new record
//! - Read path: index lookup, read at offset, decode
//! - Own the log file handles from open to close

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, ScrollError};
use crate::index::KeyIndex;
use crate::log::{record, AppendLog, Recovery, RecoveryStats};

/// A log-structured key-value store
///
/// ## Ownership Model
///
/// One `Store` exclusively owns its log file and its index. Methods that
/// touch the file take `&mut self`, so reads and writes are serialized by
/// the borrow checker rather than by locks. Sharing one backing file
/// between stores or processes is not supported.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Append-only record log (source of truth)
    log: AppendLog,

    /// key → offset of the latest record for that key
    index: KeyIndex,

    /// What recovery found when this store was opened
    recovery: RecoveryStats,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate config and create parent directories if asked to
    /// 2. Open/create the log file
    /// 3. Replay the log into a fresh index
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let mut log = AppendLog::open(&config.path, config.flush_on_write)?;
        let (index, recovery) = Recovery::recover(&mut log)?;

        info!(
            path = %config.path.display(),
            keys = index.len(),
            log_size = log.len(),
            "store opened"
        );

        Ok(Self {
            config,
            log,
            index,
            recovery,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().path(path).build();
        Self::open(config)
    }

    /// Store a key-value pair, returning the offset of its record
    ///
    /// The index is only updated once the append has succeeded.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<u64> {
        let encoded = record::encode(key, value)?;
        let offset = self.log.append(&encoded)?;
        self.index.put(key.to_vec(), offset);
        Ok(offset)
    }

    /// Get the latest value for a key
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let offset = match self.index.get(key) {
            Some(offset) => offset,
            None => return Ok(None),
        };

        let bytes = self.log.read_at(offset)?;
        let found = record::decode(&bytes, offset)?;

        if found.key != key {
            return Err(ScrollError::corrupt(
                offset,
                "index points at a record for a different key",
            ));
        }

        Ok(Some(found.value))
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.index.contains_key(key)
    }

    /// Flush all appended records to the storage medium
    ///
    /// Only needed when `flush_on_write` is off.
    pub fn sync(&mut self) -> Result<()> {
        self.log.sync()
    }

    /// Close the store, syncing the log first
    pub fn close(mut self) -> Result<()> {
        self.log.sync()?;
        debug!(path = %self.config.path.display(), "store closed");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All keys currently stored, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.index.keys()
    }

    /// Size of the log file in bytes, stale records included
    pub fn log_size(&self) -> u64 {
        self.log.len()
    }

    /// Path of the backing log file
    pub fn path(&self) -> &Path {
        self.log.path()
    }

    /// Stats from the recovery run at open
    pub fn recovery_stats(&self) -> RecoveryStats {
        self.recovery
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
