//! MSB-first bit packing for Huffman payloads.
//!
//! The first bit written lands in bit 7 of byte 0. A payload of `n` bits
//! occupies `ceil(n / 8)` bytes and the unused low bits of the final byte are
//! always zero. Readers must be told how many bits are meaningful; padding is
//! indistinguishable from data.
//!
//! # Example
//! ```
//! use smsto_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(true);
//! writer.write_bit(false);
//! writer.write_bit(true);
//! assert_eq!(writer.bit_len(), 3);
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1010_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bit().unwrap());
//! assert!(!reader.read_bit().unwrap());
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.bits_remaining(), 5);
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a growing byte buffer.
///
/// # Invariants
/// - `bytes.len() == ceil(bit_len / 8)`
/// - bits past `bit_len` in the last byte are zero
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_len: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Number of bytes the output occupies, including a partial final byte.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Consume the writer and return the packed bytes.
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads bits MSB-first from a byte slice.
///
/// # Invariants
/// - `bit_position <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read one bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` when the buffer is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.bit_position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Bits left in the buffer, padding included.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pattern(writer: &mut BitWriter, pattern: &str) {
        for c in pattern.chars() {
            writer.write_bit(c == '1');
        }
    }

    fn read_pattern(reader: &mut BitReader<'_>, count: usize) -> String {
        (0..count)
            .map(|_| if reader.read_bit().unwrap() { '1' } else { '0' })
            .collect()
    }

    #[test]
    fn test_write_read_single_byte() {
        let mut writer = BitWriter::new();
        write_pattern(&mut writer, "10110011");

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10110011]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(read_pattern(&mut reader, 8), "10110011");
    }

    #[test]
    fn test_padding_bits_are_zero() {
        let mut writer = BitWriter::new();
        for _ in 0..3 {
            writer.write_bit(true);
        }
        assert_eq!(writer.bit_len(), 3);
        assert_eq!(writer.byte_len(), 1);
        assert_eq!(writer.finish(), vec![0b1110_0000]);
    }

    #[test]
    fn test_crosses_byte_boundary() {
        let mut writer = BitWriter::new();
        write_pattern(&mut writer, "1111111");
        write_pattern(&mut writer, "101");
        assert_eq!(writer.byte_len(), 2);

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b1111_1111, 0b0100_0000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(read_pattern(&mut reader, 7), "1111111");
        assert_eq!(read_pattern(&mut reader, 3), "101");
        assert_eq!(reader.bits_remaining(), 6);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0b1010_1010];
        let mut reader = BitReader::new(&data);

        assert_eq!(read_pattern(&mut reader, 8), "10101010");
        assert_eq!(reader.bits_remaining(), 0);
        assert!(matches!(
            reader.read_bit(),
            Err(crate::error::Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let writer = BitWriter::with_capacity(64);
        assert_eq!(writer.bit_len(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn test_empty_writer() {
        let writer = BitWriter::new();
        assert!(writer.finish().is_empty());
    }
}
