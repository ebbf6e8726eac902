//! Log Scanner
//!
//! Sequential iteration over every record in the log.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};

use bytes::Bytes;

use crate::error::Result;

use super::file::read_frame;

/// Iterator over `(offset, encoded record)` pairs in write order
///
/// Yields at most one error, after which it is exhausted.
pub struct LogScanner<'a> {
    file: &'a mut BufReader<File>,
    /// Stop reading when we reach this offset (log length at scan start)
    end_offset: u64,
    /// Current position in file
    current_offset: u64,
    failed: bool,
}

impl<'a> LogScanner<'a> {
    /// Create a scanner starting at offset 0
    pub(crate) fn new(file: &'a mut BufReader<File>, end_offset: u64) -> Result<Self> {
        file.seek(SeekFrom::Start(0))?;
        Ok(Self {
            file,
            end_offset,
            current_offset: 0,
            failed: false,
        })
    }

    /// Offset of the next record to be read
    pub fn position(&self) -> u64 {
        self.current_offset
    }
}

impl<'a> Iterator for LogScanner<'a> {
    type Item = Result<(u64, Bytes)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.current_offset >= self.end_offset {
            return None;
        }

        let offset = self.current_offset;
        match read_frame(&mut *self.file, offset, self.end_offset - offset) {
            Ok(frame) => {
                self.current_offset += frame.len() as u64;
                Some(Ok((offset, frame)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
