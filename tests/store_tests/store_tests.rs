//! Tests for Store
//!
//! These tests verify:
//! - Basic set/get operations
//! - Overwrite semantics and absent keys
//! - Persistence across close/reopen
//! - Config handling (directories, validation, durability modes)
//! - Corrupt logs fail open instead of exposing a partial index

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use scrollkv::config::Config;
use scrollkv::log::record;
use scrollkv::{ScrollError, Store};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Helper Functions
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup_temp_store() -> (TempDir, PathBuf, Store) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("data.log");
    let config = Config::builder()
        .path(&log_path)
        .flush_on_write(true) // Sync every write for test reliability
        .build();
    let store = Store::open(config).unwrap();
    (temp_dir, log_path, store)
}

fn reopen(path: &PathBuf) -> Store {
    Store::open_path(path).unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_open_creates_log_file() {
    let (_temp, log_path, store) = setup_temp_store();

    assert!(log_path.exists());
    assert!(store.is_empty());
    assert_eq!(store.log_size(), 0);
    assert_eq!(store.path(), log_path.as_path());
}

#[test]
fn test_set_and_get() {
    let (_temp, _path, mut store) = setup_temp_store();

    store.set(b"user:1", b"test1").unwrap();
    store.set(b"user:2", b"test2").unwrap();

    assert_eq!(store.get(b"user:1").unwrap(), Some(b"test1".to_vec()));
    assert_eq!(store.get(b"user:2").unwrap(), Some(b"test2".to_vec()));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_get_missing_key() {
    let (_temp, _path, mut store) = setup_temp_store();

    assert_eq!(store.get(b"missing").unwrap(), None);

    store.set(b"present", b"v").unwrap();
    assert_eq!(store.get(b"missing").unwrap(), None);
    assert!(!store.contains_key(b"missing"));
    assert!(store.contains_key(b"present"));
}

#[test]
fn test_overwrite() {
    let (_temp, _path, mut store) = setup_temp_store();

    store.set(b"user:1", b"test1").unwrap();
    store.set(b"user:1", b"test2").unwrap();

    assert_eq!(store.get(b"user:1").unwrap(), Some(b"test2".to_vec()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_set_returns_increasing_offsets() {
    let (_temp, _path, mut store) = setup_temp_store();

    let a = store.set(b"a", b"1").unwrap();
    let b = store.set(b"b", b"22").unwrap();
    let c = store.set(b"a", b"333").unwrap();

    assert_eq!(a, 0);
    assert_eq!(b, record::encoded_len(b"a", b"1") as u64);
    assert!(c > b);
}

#[test]
fn test_log_grows_by_encoded_len() {
    let (_temp, log_path, mut store) = setup_temp_store();

    let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..25)
        .map(|i| (format!("key{}", i % 7).into_bytes(), vec![b'x'; i]))
        .collect();

    let mut expected = 0u64;
    for (key, value) in &pairs {
        store.set(key, value).unwrap();
        expected += record::encoded_len(key, value) as u64;
    }

    assert_eq!(store.log_size(), expected);
    assert_eq!(fs::metadata(&log_path).unwrap().len(), expected);
}

#[test]
fn test_values_with_delimiters() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"csv", b"a,b,c\n1,2,3\n").unwrap();
    store.set(b"k,with,commas", b"v").unwrap();
    store.set(b"after", b"still fine").unwrap();
    store.close().unwrap();

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"csv").unwrap(), Some(b"a,b,c\n1,2,3\n".to_vec()));
    assert_eq!(store.get(b"k,with,commas").unwrap(), Some(b"v".to_vec()));
    assert_eq!(store.get(b"after").unwrap(), Some(b"still fine".to_vec()));
}

#[test]
fn test_empty_key_and_value() {
    let (_temp, _path, mut store) = setup_temp_store();

    store.set(b"", b"empty key").unwrap();
    store.set(b"empty value", b"").unwrap();

    assert_eq!(store.get(b"").unwrap(), Some(b"empty key".to_vec()));
    assert_eq!(store.get(b"empty value").unwrap(), Some(Vec::new()));
}

#[test]
fn test_keys() {
    let (_temp, _path, mut store) = setup_temp_store();

    store.set(b"a", b"1").unwrap();
    store.set(b"b", b"2").unwrap();
    store.set(b"a", b"3").unwrap();

    let keys: HashSet<Vec<u8>> = store.keys().map(|k| k.to_vec()).collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&b"a".to_vec()));
    assert!(keys.contains(&b"b".to_vec()));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persistence_across_reopen() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"k", b"v").unwrap();
    store.close().unwrap();

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn test_persistence_after_drop_without_close() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"k", b"v").unwrap();
    drop(store);

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn test_reopen_keeps_latest_value() {
    let (_temp, log_path, mut store) = setup_temp_store();

    for i in 0..50 {
        store.set(b"counter", format!("{}", i).as_bytes()).unwrap();
    }
    store.close().unwrap();

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"counter").unwrap(), Some(b"49".to_vec()));
    assert_eq!(store.len(), 1);

    let stats = store.recovery_stats();
    assert_eq!(stats.records_replayed, 50);
    assert_eq!(stats.live_keys, 1);
}

#[test]
fn test_writes_after_reopen() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"a", b"1").unwrap();
    let size = store.log_size();
    store.close().unwrap();

    let mut store = reopen(&log_path);
    let offset = store.set(b"b", b"2").unwrap();
    assert_eq!(offset, size);
    store.set(b"a", b"3").unwrap();
    store.close().unwrap();

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"a").unwrap(), Some(b"3".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn test_open_nonexistent_is_empty() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("never_written.log");

    let mut store = Store::open_path(&log_path).unwrap();

    assert!(store.is_empty());
    assert_eq!(store.get(b"anything").unwrap(), None);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_open_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("nested").join("dir").join("data.log");

    let config = Config::builder().path(&log_path).build();
    let _store = Store::open(config).unwrap();

    assert!(log_path.exists());
}

#[test]
fn test_open_without_create_dirs_fails_on_missing_parent() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("missing").join("data.log");

    let config = Config::builder().path(&log_path).create_dirs(false).build();

    assert!(matches!(Store::open(config), Err(ScrollError::Io(_))));
}

#[test]
fn test_open_directory_path_rejected() {
    let temp_dir = TempDir::new().unwrap();

    let config = Config::builder().path(temp_dir.path()).build();

    assert!(matches!(Store::open(config), Err(ScrollError::Config(_))));
}

#[test]
fn test_open_empty_path_rejected() {
    let config = Config::builder().path("").build();

    assert!(matches!(Store::open(config), Err(ScrollError::Config(_))));
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.flush_on_write);
    assert!(config.create_dirs);
    assert!(config.path.ends_with("data.log"));
}

#[test]
fn test_best_effort_mode() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("data.log");
    let config = Config::builder().path(&log_path).flush_on_write(false).build();

    let mut store = Store::open(config).unwrap();
    assert!(!store.config().flush_on_write);

    store.set(b"k", b"v").unwrap();
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    store.sync().unwrap();
    store.close().unwrap();

    let mut store = reopen(&log_path);
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_open_fails_on_corrupt_record() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"a", b"1").unwrap();
    let second = store.set(b"b", b"2").unwrap();
    store.set(b"c", b"3").unwrap();
    store.close().unwrap();

    // Flip a byte inside the second record's key
    let mut data = fs::read(&log_path).unwrap();
    data[second as usize + record::RECORD_HEADER_SIZE] ^= 0x20;
    fs::write(&log_path, &data).unwrap();

    match Store::open_path(&log_path) {
        Err(ScrollError::CorruptRecord { offset, .. }) => assert_eq!(offset, second),
        Err(other) => panic!("Expected CorruptRecord, got {:?}", other),
        Ok(_) => panic!("Expected open to fail"),
    }
}

#[test]
fn test_open_fails_on_torn_tail() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"a", b"1").unwrap();
    let end = store.log_size();
    store.close().unwrap();

    let torn = record::encode(b"b", b"never finished").unwrap();
    let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
    file.write_all(&torn[..torn.len() - 3]).unwrap();
    drop(file);

    match Store::open_path(&log_path) {
        Err(err) => assert_eq!(err.corrupt_offset(), Some(end)),
        Ok(_) => panic!("Expected open to fail"),
    }
}

#[test]
fn test_get_detects_tampering_after_open() {
    let (_temp, log_path, mut store) = setup_temp_store();

    let offset = store.set(b"key", b"value").unwrap();

    // Overwrite the value bytes on disk behind the store's back
    let mut data = fs::read(&log_path).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0xFF;
    fs::write(&log_path, &data).unwrap();

    match store.get(b"key") {
        Err(ScrollError::CorruptRecord { offset: at, .. }) => assert_eq!(at, offset),
        other => panic!("Expected CorruptRecord, got {:?}", other),
    }
}

// =============================================================================
// Write Failure Tests
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_failed_set_leaves_index_unchanged() {
    init_tracing();
    let full = std::path::Path::new("/dev/full");
    if !full.exists() {
        return;
    }

    let config = Config::builder().path(full).create_dirs(false).build();
    let mut store = Store::open(config).unwrap();

    assert!(matches!(store.set(b"k", b"v"), Err(ScrollError::Io(_))));
    assert_eq!(store.get(b"k").unwrap(), None);
    assert!(!store.contains_key(b"k"));
    assert_eq!(store.len(), 0);
    assert_eq!(store.log_size(), 0);

    // Rollback is impossible on a device, so later writes are refused
    assert!(matches!(
        store.set(b"k", b"v"),
        Err(ScrollError::LogUnwritable { .. })
    ));
    assert_eq!(store.get(b"k").unwrap(), None);
    assert_eq!(store.log_size(), 0);
}

#[test]
fn test_get_after_external_truncation_is_corrupt() {
    let (_temp, log_path, mut store) = setup_temp_store();

    store.set(b"a", b"1").unwrap();
    let second = store.set(b"b", b"a value that gets cut").unwrap();

    let file = OpenOptions::new().write(true).open(&log_path).unwrap();
    file.set_len(second + record::RECORD_HEADER_SIZE as u64 + 1).unwrap();
    drop(file);

    match store.get(b"b") {
        Err(ScrollError::CorruptRecord { offset, .. }) => assert_eq!(offset, second),
        other => panic!("Expected CorruptRecord, got {:?}", other),
    }
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
}
