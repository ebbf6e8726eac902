//! Log Recovery
//!
//! Rebuilds the key index by replaying the log from offset 0.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use bytes::Bytes;
use tracing::{error, info};

use crate::error::Result;
use crate::index::KeyIndex;

use super::file::AppendLog;
use super::record;
use super::scan::LogScanner;

/// Replays a log into a fresh index
pub struct Recovery;

/// Result of a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Number of records decoded
    pub records_replayed: u64,

    /// Number of distinct keys in the rebuilt index
    pub live_keys: usize,

    /// Total bytes of records read
    pub bytes_scanned: u64,
}

impl Recovery {
    /// Rebuild the index from an open log
    ///
    /// Later records for a key overwrite earlier ones, so the result holds
    /// the offset of each key's last record. The first record that fails to
    /// decode aborts the replay; the partially built index is discarded.
    pub fn recover(log: &mut AppendLog) -> Result<(KeyIndex, RecoveryStats)> {
        let path = log.path().to_path_buf();

        match replay(log.scan()?) {
            Ok((index, stats)) => {
                info!(
                    path = %path.display(),
                    records = stats.records_replayed,
                    keys = stats.live_keys,
                    bytes = stats.bytes_scanned,
                    "recovered append log"
                );
                Ok((index, stats))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "recovery aborted");
                Err(e)
            }
        }
    }

    /// Check a log file without opening it for writing
    ///
    /// A missing file is an empty log.
    pub fn verify(path: &Path) -> Result<RecoveryStats> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RecoveryStats::default()),
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let (_, stats) = replay(LogScanner::new(&mut reader, len)?)?;
        Ok(stats)
    }
}

fn replay<I>(records: I) -> Result<(KeyIndex, RecoveryStats)>
where
    I: Iterator<Item = Result<(u64, Bytes)>>,
{
    let mut index = KeyIndex::new();
    let mut stats = RecoveryStats::default();

    for item in records {
        let (offset, bytes) = item?;
        let decoded = record::decode(&bytes, offset)?;

        // value is discarded, only the pointer is kept
        index.put(decoded.key, offset);

        stats.records_replayed += 1;
        stats.bytes_scanned += bytes.len() as u64;
    }

    stats.live_keys = index.len();
    Ok((index, stats))
}
