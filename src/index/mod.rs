//! Index Module
//!
//! In-memory map from key to the offset of its latest record.
//!
//! ## Responsibilities
//! - O(1) average lookup of a key's record offset
//! - Last-write-wins overwrite on every put
//! - Never holds values: every entry is a pointer into the log
//!
//! ## Data Structure Choice
//! Using a plain HashMap:
//! - Key order is irrelevant, there are no range scans
//! - The store is single-threaded and owns the index outright, so no lock
//! - Rebuilt from the log on every open, never persisted

mod table;

pub use table::KeyIndex;
