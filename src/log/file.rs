//! Append Log file
//!
//! Owns the backing file for its whole lifetime and hands out offsets.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, error, warn};

use crate::error::{Result, ScrollError};

use super::record::{self, RECORD_HEADER_SIZE};
use super::scan::LogScanner;

/// Append-only record log backed by a single file
///
/// Writes go through `writer` at the logical end of the log; reads and
/// scans go through a separate buffered handle so the write position is
/// never disturbed.
pub struct AppendLog {
    path: PathBuf,
    writer: File,
    reader: BufReader<File>,
    /// Logical length: every byte below this belongs to an acknowledged record
    len: u64,
    flush_on_write: bool,
    /// Set when a failed append could not be rolled back; bytes past `len`
    /// are then unknown, so further appends are refused
    unwritable: bool,
}

impl AppendLog {
    /// Open or create the log at `path`
    ///
    /// Existing content is never truncated.
    pub fn open(path: &Path, flush_on_write: bool) -> Result<Self> {
        let writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        let len = writer.metadata()?.len();
        let reader = BufReader::new(File::open(path)?);

        debug!(path = %path.display(), len, flush_on_write, "opened append log");

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            reader,
            len,
            flush_on_write,
            unwritable: false,
        })
    }

    /// Append `bytes` at the end of the log, returning the offset it starts at
    ///
    /// On failure the file is rolled back to its previous length and the
    /// logical length is left unchanged. If that rollback also fails, the
    /// log refuses every later append with `LogUnwritable`.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        if self.unwritable {
            return Err(ScrollError::LogUnwritable { len: self.len });
        }

        let offset = self.len;

        if let Err(e) = self.write_at(offset, bytes) {
            warn!(offset, error = %e, "append failed, rolling back");
            self.rollback(offset);
            return Err(e);
        }

        self.len += bytes.len() as u64;
        debug!(offset, len = bytes.len(), "appended record");
        Ok(offset)
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        self.writer.seek(SeekFrom::Start(offset))?;
        self.writer.write_all(bytes)?;
        if self.flush_on_write {
            self.writer.sync_data()?;
        }
        Ok(())
    }

    fn rollback(&mut self, len: u64) {
        if let Err(e) = self.writer.set_len(len) {
            error!(
                path = %self.path.display(),
                len,
                error = %e,
                "failed to roll back partial append, refusing further writes"
            );
            self.unwritable = true;
        }
    }

    /// Whether a failed rollback has left the log closed for appends
    pub fn is_unwritable(&self) -> bool {
        self.unwritable
    }

    /// Read the encoded bytes of the record starting at `offset`
    pub fn read_at(&mut self, offset: u64) -> Result<Bytes> {
        if offset >= self.len {
            return Err(ScrollError::OffsetOutOfRange {
                offset,
                log_size: self.len,
            });
        }

        self.reader.seek(SeekFrom::Start(offset))?;
        let frame = read_frame(&mut self.reader, offset, self.len - offset)?;
        debug!(offset, len = frame.len(), "read record");
        Ok(frame)
    }

    /// Iterate every record from offset 0 in write order
    ///
    /// The scan stops at the length the log had when it started.
    pub fn scan(&mut self) -> Result<LogScanner<'_>> {
        LogScanner::new(&mut self.reader, self.len)
    }

    /// Force everything written so far onto the storage medium
    pub fn sync(&mut self) -> Result<()> {
        self.writer.sync_all()?;
        Ok(())
    }

    /// Logical length of the log in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read one record frame from `reader`, positioned at `offset`
///
/// `remaining` is the number of log bytes from `offset` to the end. The
/// header decides how many bytes follow; a frame that would run past the
/// end of the log is a corrupt record.
pub(super) fn read_frame<R: Read>(reader: &mut R, offset: u64, remaining: u64) -> Result<Bytes> {
    if remaining < RECORD_HEADER_SIZE as u64 {
        return Err(ScrollError::corrupt(
            offset,
            format!(
                "truncated header: {} bytes left in log, need {}",
                remaining, RECORD_HEADER_SIZE
            ),
        ));
    }

    let mut header = [0u8; RECORD_HEADER_SIZE];
    read_exact_at(reader, &mut header, offset)?;

    let frame_len = record::frame_len(&header);
    if frame_len > remaining {
        return Err(ScrollError::corrupt(
            offset,
            format!(
                "record declares {} bytes but only {} remain in log",
                frame_len, remaining
            ),
        ));
    }

    let mut frame = vec![0u8; frame_len as usize];
    frame[..RECORD_HEADER_SIZE].copy_from_slice(&header);
    read_exact_at(reader, &mut frame[RECORD_HEADER_SIZE..], offset)?;

    Ok(Bytes::from(frame))
}

/// `read_exact`, with a file shorter than the log's length reported as a
/// corrupt record at `offset`
fn read_exact_at<R: Read>(reader: &mut R, buf: &mut [u8], offset: u64) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(ScrollError::corrupt(
            offset,
            "log file ends before the record does",
        )),
        Err(e) => Err(e.into()),
    }
}
