//! SMS text form of an encoded message.
//!
//! An SMS carries text, so the binary container is optionally gzipped and
//! then written as standard Base64, which stays inside the GSM-7 basic
//! character set. The text is cut into segments for sending.
//!
//! Reading reverses this. Segments are joined and whitespace is dropped
//! (pasted segments usually arrive one per line). A gzip stream is
//! recognised by its magic bytes, so both forms are read the same way.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::framing::{parse_frame, serialize_frame, MAGIC};
use crate::sms::{join_segments, split_for_sms};
use crate::EncodedMessage;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Largest container accepted after inflating a gzip stream.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Whether the container is gzipped before Base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

/// Render `message` as SMS-safe Base64 text.
pub fn to_text(message: &EncodedMessage, compression: Compression) -> Result<String> {
    let frame = serialize_frame(message)?;
    let frame_len = frame.len();
    let bytes = match compression {
        Compression::None => frame,
        Compression::Gzip => gzip(&frame)?,
    };
    debug!(frame_len, packed_len = bytes.len(), ?compression, "packed message as text");
    Ok(STANDARD.encode(bytes))
}

/// Read a message back from its text form.
///
/// Whitespace anywhere in `text` is ignored.
///
/// # Errors
/// - `TransportError::InvalidBase64` if the text is not standard Base64
/// - `TransportError::Gzip` / `TransportError::TooLarge` for a bad gzip stream
/// - any `FramingError` or `Error::Crc` from the container inside
pub fn from_text(text: &str) -> Result<EncodedMessage> {
    let compact: String = text.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(TransportError::from)?;
    let frame = if bytes.starts_with(&GZIP_MAGIC) {
        gunzip(&bytes)?
    } else {
        bytes
    };
    parse_frame(&frame)
}

/// Render `message` as text and split it into SMS segments.
pub fn to_segments(
    message: &EncodedMessage,
    compression: Compression,
    segment_len: usize,
) -> Result<Vec<String>> {
    let text = to_text(message, compression)?;
    let segments = split_for_sms(&text, segment_len)?;
    debug!(chars = text.len(), segments = segments.len(), "split message for SMS");
    Ok(segments.into_iter().map(str::to_owned).collect())
}

/// Reassemble segments from [`to_segments`] into a message.
pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<EncodedMessage> {
    from_text(&join_segments(segments))
}

/// Read a message from raw file contents: a binary container or its text form.
pub fn read_message(data: &[u8]) -> Result<EncodedMessage> {
    if data.starts_with(&MAGIC) {
        return parse_frame(data);
    }
    let text = std::str::from_utf8(data).map_err(|_| TransportError::NotText)?;
    from_text(text)
}

fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(data).map_err(TransportError::Gzip)?;
    Ok(encoder.finish().map_err(TransportError::Gzip)?)
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut frame = Vec::new();
    GzDecoder::new(data)
        .take(MAX_FRAME_LEN as u64 + 1)
        .read_to_end(&mut frame)
        .map_err(TransportError::Gzip)?;
    if frame.len() > MAX_FRAME_LEN {
        return Err(TransportError::TooLarge {
            limit: MAX_FRAME_LEN,
        }
        .into());
    }
    Ok(frame)
}
