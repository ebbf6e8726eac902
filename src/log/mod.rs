//! Append Log Module
//!
//! The single source of truth for every key-value pair.
//!
//! ## Responsibilities
//! - Append encoded records and hand out their offsets
//! - Read one record back from an offset
//! - Scan all records in write order for recovery
//! - CRC32 checksums for corruption detection
//!
//! ## File Format
//! The file is nothing but records back to back, no header or footer:
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │ Record @ 0                                        │
//! │ ┌─────────┬───────────┬───────────┬─────┬───────┐ │
//! │ │ CRC (4) │ KeyLen(4) │ ValLen(4) │ Key │ Value │ │
//! │ └─────────┴───────────┴───────────┴─────┴───────┘ │
//! ├───────────────────────────────────────────────────┤
//! │ Record @ 12 + |key| + |value|                     │
//! │ ┌─────────┬───────────┬───────────┬─────┬───────┐ │
//! │ │ CRC (4) │ KeyLen(4) │ ValLen(4) │ Key │ Value │ │
//! │ └─────────┴───────────┴───────────┴─────┴───────┘ │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod record;
mod file;
mod scan;
mod recovery;

pub use record::{Record, RECORD_HEADER_SIZE};
pub use file::AppendLog;
pub use scan::LogScanner;
pub use recovery::{Recovery, RecoveryStats};
