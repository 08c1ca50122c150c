//! Binary container for one encoded message.
//!
//! The coder's output is two pieces, a serialized table and a packed
//! payload. The container keeps them together on disk with a checksum.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x53 0x4D 0x53 0x48 ("SMSH")
//! +------------------+
//! | table_len (4)    |  u32 little-endian, bytes of serialized table
//! +------------------+
//! | payload_len (4)  |  u32 little-endian, bytes of packed payload
//! +------------------+
//! | crc32 (4)        |  u32 over lengths, table and payload
//! +------------------+
//! | table            |  UTF-8 serialized code table
//! +------------------+
//! | payload          |  MSB-first packed bits
//! +------------------+
//! ```

use crate::error::{Error, FramingError, Result};
use crate::EncodedMessage;

/// Magic number: "SMSH"
pub const MAGIC: [u8; 4] = [0x53, 0x4D, 0x53, 0x48];

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 16;

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn section_len(len: usize) -> Result<u32> {
    Ok(u32::try_from(len).map_err(|_| FramingError::Oversized(len))?)
}

fn compute_crc(table_len: u32, payload_len: u32, table: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&table_len.to_le_bytes());
    hasher.update(&payload_len.to_le_bytes());
    hasher.update(table);
    hasher.update(payload);
    hasher.finalize()
}

/// Serialize a message into a frame.
///
/// # Errors
/// `FramingError::Oversized` if either section exceeds `u32::MAX` bytes.
pub fn serialize_frame(message: &EncodedMessage) -> Result<Vec<u8>> {
    let table = message.table.as_bytes();
    let payload = &message.payload;
    let table_len = section_len(table.len())?;
    let payload_len = section_len(payload.len())?;
    let crc32 = compute_crc(table_len, payload_len, table, payload);

    let mut frame = Vec::with_capacity(HEADER_SIZE + table.len() + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&table_len.to_le_bytes());
    frame.extend_from_slice(&payload_len.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(table);
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Parse a frame back into a message.
///
/// The table is returned as-is; it is parsed later by the decoder.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the header is incomplete
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `FramingError::LengthMismatch` if the sections don't add up
/// - `Error::Crc` if the checksum fails
/// - `FramingError::InvalidUtf8` if the table is not UTF-8
pub fn parse_frame(bytes: &[u8]) -> Result<EncodedMessage> {
    if bytes.len() < HEADER_SIZE {
        return Err(FramingError::FrameTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&bytes[0..4]);
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let table_len = read_u32(bytes, 4);
    let payload_len = read_u32(bytes, 8);
    let crc32 = read_u32(bytes, 12);

    let expected = HEADER_SIZE + table_len as usize + payload_len as usize;
    if bytes.len() != expected {
        return Err(FramingError::LengthMismatch {
            expected,
            actual: bytes.len(),
        }
        .into());
    }

    let (table, payload) = bytes[HEADER_SIZE..].split_at(table_len as usize);

    let computed = compute_crc(table_len, payload_len, table, payload);
    if computed != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    let table = std::str::from_utf8(table).map_err(|_| FramingError::InvalidUtf8)?;

    Ok(EncodedMessage {
        table: table.to_string(),
        payload: payload.to_vec(),
    })
}
