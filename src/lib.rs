//! # scrollkv
//!
//! A minimal log-structured key-value store:
//! - Append-only record log as the single source of truth
//! - Length-prefixed, checksummed record codec
//! - In-memory index of key → offset of the latest record
//! - Index rebuilt by full-log replay on every open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │               open / set / get / close                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Append Log  │◀─────────│  Recovery   │
//!   │  (Record    │  scan    │  (replay)   │
//!   │   codec)    │          └──────┬──────┘
//!   └─────────────┘                 │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Key Index  │
//!                           │  (HashMap)  │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use scrollkv::Store;
//! use std::path::Path;
//!
//! let mut store = Store::open_path(Path::new("data.log")).unwrap();
//! store.set(b"user:1", b"test1").unwrap();
//! assert_eq!(store.get(b"user:1").unwrap(), Some(b"test1".to_vec()));
//! store.close().unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ScrollError, Result};
pub use config::Config;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of scrollkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
