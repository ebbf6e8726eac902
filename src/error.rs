//! Error types for scrollkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ScrollError
pub type Result<T> = std::result::Result<T, ScrollError>;

/// Unified error type for scrollkv operations
#[derive(Debug, Error)]
pub enum ScrollError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Backing medium unavailable, full, or permission denied. Never retried.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    /// The bytes at `offset` do not parse as a record.
    #[error("Corrupt record at offset {offset}: {reason}")]
    CorruptRecord { offset: u64, reason: String },

    /// A read was requested at or past the end of the log.
    #[error("Offset {offset} out of range (log size {log_size})")]
    OffsetOutOfRange { offset: u64, log_size: u64 },

    /// An earlier failed append could not be rolled back; the log accepts
    /// no more writes. Records below `len` are intact.
    #[error("Log no longer writable after failed rollback (last good length {len})")]
    LogUnwritable { len: u64 },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// A key or value is longer than a record length prefix can describe.
    #[error("Record {field} too large: {len} bytes")]
    RecordTooLarge { field: &'static str, len: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrollError {
    pub(crate) fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        ScrollError::CorruptRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// Offset of the offending record, if this is a corruption error
    pub fn corrupt_offset(&self) -> Option<u64> {
        match self {
            ScrollError::CorruptRecord { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
