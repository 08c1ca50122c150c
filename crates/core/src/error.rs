//! Error types for the smsto coder.
//!
//! Every failure is a local, synchronous validation failure. Callers should
//! treat any of them as "this payload is corrupt or was not produced by this
//! coder" and must not retry the same input.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Table: serialized code table parsing
/// - Huffman: encode/decode failures
/// - Framing: binary container serialization/parsing
/// - Transport: SMS text form (Base64, optional gzip)
/// - CRC: container corruption detected
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Serialized code table is malformed
    #[error("malformed code table: {0}")]
    Table(#[from] TableError),

    /// Huffman encode or decode failure
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Container header or length error
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// SMS text form could not be packed or unpacked
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Invalid caller-supplied setting
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,
}

/// Errors raised while parsing or validating a serialized code table.
#[derive(Debug, Error)]
pub enum TableError {
    /// No `|` separating the bit count from the entries
    #[error("missing '|' after bit count")]
    MissingBitCount,

    /// Bit count is not a non-negative decimal integer
    #[error("invalid bit count {0:?}")]
    InvalidBitCount(String),

    /// No usable entries survived parsing
    #[error("code map is empty")]
    EmptyCodeMap,

    /// A code field contains something other than '0'/'1', or is empty
    #[error("invalid code {0:?}")]
    InvalidCode(String),

    /// A code is a prefix of (or equal to) another code in the same table
    #[error("code {code} is a prefix of another code")]
    NotPrefixFree { code: String },
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Nothing to encode or decode
    #[error("input is empty")]
    EmptyInput,

    /// A symbol in the input has no code. This is an encoder bug.
    #[error("no code assigned for symbol {symbol:?}")]
    MissingCode { symbol: char },

    /// `serialize_code_map` was called before a successful `encode`
    #[error("no code table available: encode has not run")]
    NoCodeTable,

    /// The table claims more bits than the payload carries
    #[error("valid bit count {valid_bits} exceeds available {available} bits")]
    BitBudgetExceeded { valid_bits: usize, available: usize },

    /// The bit stream ended in the middle of a code
    #[error("incomplete code at end of bit stream: {pending}")]
    IncompleteCode { pending: String },

    /// Decoding produced no symbols
    #[error("decoded result is empty")]
    EmptyDecodeResult,

    /// Decoded text contains a character outside the Base64 alphabet
    #[error("decoded text is not Base64: {symbol:?} at position {position}")]
    InvalidAlphabetOutput { symbol: char, position: usize },
}

/// Binary container errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame is too short to contain a valid header
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Total length doesn't match the header's table and payload lengths
    #[error("frame length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The table section is not UTF-8
    #[error("code table is not valid UTF-8")]
    InvalidUtf8,

    /// A section is too large for the header's length fields
    #[error("section of {0} bytes does not fit in a u32 length field")]
    Oversized(usize),
}

/// Errors in the SMS text form of a message.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The text is not standard Base64
    #[error("invalid Base64 text: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Compressing or inflating the gzip stream failed
    #[error("gzip stream error: {0}")]
    Gzip(#[source] std::io::Error),

    /// The inflated container exceeds the size limit
    #[error("inflated message exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// Input is neither a container nor UTF-8 text
    #[error("message is neither a container nor text")]
    NotText,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
