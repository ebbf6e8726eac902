//! Key index implementation
//!
//! HashMap-based key → offset table.

use std::collections::HashMap;

/// Maps each key to the offset of its most recently appended record
#[derive(Debug, Default, Clone)]
pub struct KeyIndex {
    entries: HashMap<Vec<u8>, u64>,
}

impl KeyIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at `offset`, replacing any previous entry
    pub fn put(&mut self, key: Vec<u8>, offset: u64) {
        self.entries.insert(key, offset);
    }

    /// Offset of the latest record for `key`
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All indexed keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(|k| k.as_slice())
    }
}
