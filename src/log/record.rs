//! Record codec
//!
//! Encoding and decoding of a single (key, value) record.
//!
//! ## Record Format
//! ```text
//! ┌───────────┬─────────────┬───────────────┬───────────┬─────────────┐
//! │ CRC (4)   │ KeyLen (4)  │ ValueLen (4)  │    Key    │    Value    │
//! └───────────┴─────────────┴───────────────┴───────────┴─────────────┘
//! ```
//!
//! All integers are big-endian. The CRC covers every byte after it
//! (both lengths, key and value). Fields are length-prefixed, so keys and
//! values may contain any byte, including `,` and `\n`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, ScrollError};

/// Header size: crc (4) + key_len (4) + value_len (4)
pub const RECORD_HEADER_SIZE: usize = 12;

/// A decoded (key, value) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode this record
    pub fn encode(&self) -> Result<Bytes> {
        encode(&self.key, &self.value)
    }

    /// Size of this record on the log
    pub fn encoded_len(&self) -> usize {
        encoded_len(&self.key, &self.value)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a key-value pair to its on-log bytes
///
/// Fails with `RecordTooLarge` if either field does not fit a u32 length.
pub fn encode(key: &[u8], value: &[u8]) -> Result<Bytes> {
    let key_len = length_prefix("key", key.len())?;
    let value_len = length_prefix("value", value.len())?;

    let mut buf = BytesMut::with_capacity(encoded_len(key, value));
    buf.put_u32(0); // CRC placeholder, filled in below
    buf.put_u32(key_len);
    buf.put_u32(value_len);
    buf.put_slice(key);
    buf.put_slice(value);

    let crc = crc32fast::hash(&buf[4..]);
    buf[0..4].copy_from_slice(&crc.to_be_bytes());

    Ok(buf.freeze())
}

/// Number of bytes `encode(key, value)` produces
pub fn encoded_len(key: &[u8], value: &[u8]) -> usize {
    RECORD_HEADER_SIZE + key.len() + value.len()
}

fn length_prefix(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ScrollError::RecordTooLarge { field, len })
}

// =============================================================================
// Decoding
// =============================================================================

/// Total record length declared by a header, header included
pub fn frame_len(header: &[u8; RECORD_HEADER_SIZE]) -> u64 {
    let key_len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    let value_len = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
    RECORD_HEADER_SIZE as u64 + key_len as u64 + value_len as u64
}

/// Decode exactly one record from `bytes`
///
/// `offset` is where the bytes start on the log; it is only used to
/// report `CorruptRecord`.
pub fn decode(bytes: &[u8], offset: u64) -> Result<Record> {
    if bytes.len() < RECORD_HEADER_SIZE {
        return Err(ScrollError::corrupt(
            offset,
            format!(
                "truncated header: expected {} bytes, got {}",
                RECORD_HEADER_SIZE,
                bytes.len()
            ),
        ));
    }

    let mut buf = bytes;
    let stored_crc = buf.get_u32();
    let key_len = buf.get_u32() as usize;
    let value_len = buf.get_u32() as usize;

    let declared = key_len as u64 + value_len as u64;
    if declared != buf.remaining() as u64 {
        return Err(ScrollError::corrupt(
            offset,
            format!(
                "length mismatch: header declares {} payload bytes, got {}",
                declared,
                buf.remaining()
            ),
        ));
    }

    let computed_crc = crc32fast::hash(&bytes[4..]);
    if stored_crc != computed_crc {
        return Err(ScrollError::corrupt(
            offset,
            format!(
                "checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored_crc, computed_crc
            ),
        ));
    }

    let key = buf[..key_len].to_vec();
    buf.advance(key_len);
    let value = buf.to_vec();

    Ok(Record { key, value })
}
