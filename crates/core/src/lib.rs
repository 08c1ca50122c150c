//! smsto-core: Huffman coding for Base64 text sent over SMS
//!
//! An image is turned into Base64 text elsewhere; this crate squeezes that
//! text into a packed bitstream plus a small textual code table, and turns
//! the pair back into the exact original text.
//!
//! # Architecture
//!
//! - `tree`: frequency counting, Huffman tree, code assignment
//! - `bitio`: MSB-first bit packing and unpacking
//! - `codetable`: code table wire format (escaping, parsing)
//! - `encoder` / `decoder`: the two halves of the coder
//! - `alphabet`: the Base64 alphabet the decoder enforces on its output
//! - `framing`: binary container holding table and payload together
//! - `sms`: splitting text into SMS segments
//! - `transport`: SMS text form of a message (Base64, optional gzip)
//! - `metrics`: size and ratio reporting
//!
//! # Example
//!
//! ```
//! let message = smsto_core::encode("QUJD").unwrap();
//! assert_eq!(smsto_core::decode(&message).unwrap(), "QUJD");
//! ```

pub mod alphabet;
pub mod bitio;
pub mod codetable;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod metrics;
pub mod sms;
pub mod transport;
pub mod tree;

// Re-export commonly used types
pub use decoder::{HuffmanDecoder, Strictness};
pub use encoder::HuffmanEncoder;
pub use error::{Error, Result};
pub use transport::Compression;

/// The two pieces of an encoded message: serialized code table and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Serialized code table, valid bit count included
    pub table: String,

    /// MSB-first packed payload
    pub payload: Vec<u8>,
}

/// Encode `input` with a fresh encoder.
pub fn encode(input: &str) -> Result<EncodedMessage> {
    let mut encoder = HuffmanEncoder::new();
    let payload = encoder.encode(input)?;
    let table = encoder.serialize_code_map()?;
    Ok(EncodedMessage { table, payload })
}

/// Decode a message with the default (lenient) decoder.
pub fn decode(message: &EncodedMessage) -> Result<String> {
    HuffmanDecoder::new().decode(&message.table, &message.payload)
}
