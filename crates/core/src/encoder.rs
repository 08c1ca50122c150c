//! Huffman encoder: text in, packed bits plus a code table out.
//!
//! An encoder keeps the code table of its most recent `encode` call so that
//! `serialize_code_map` can render it afterwards. One instance serves one
//! encode at a time.

use tracing::{debug, warn};

use crate::alphabet::is_base64_symbol;
use crate::bitio::BitWriter;
use crate::codetable::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::tree::HuffmanTree;

/// Stateful Huffman encoder.
#[derive(Debug, Clone, Default)]
pub struct HuffmanEncoder {
    table: Option<CodeTable>,
    valid_bits: usize,
}

impl HuffmanEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `input`, returning `ceil(valid_bits / 8)` packed bytes.
    ///
    /// Symbols outside the Base64 alphabet are encoded like any other but
    /// logged as a warning. Any previous table is discarded first, so a
    /// failed call leaves the encoder without a table.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyInput` if `input` is empty
    /// - `HuffmanError::MissingCode` if the tree failed to cover a symbol
    pub fn encode(&mut self, input: &str) -> Result<Vec<u8>> {
        self.table = None;
        self.valid_bits = 0;

        if input.is_empty() {
            return Err(HuffmanError::EmptyInput.into());
        }
        debug!(symbols = input.chars().count(), "encoding input");

        let tree = HuffmanTree::from_text(input)?;
        debug!(
            distinct = tree.symbol_count(),
            weight = tree.total_weight(),
            "built huffman tree"
        );
        let table = tree.code_table();
        for (symbol, code) in table.iter() {
            if !is_base64_symbol(symbol) {
                warn!(symbol = ?symbol, "non-Base64 symbol in input");
            }
            debug!(symbol = ?symbol, code = %code, "assigned code");
        }

        let mut writer = BitWriter::with_capacity(input.len());
        for symbol in input.chars() {
            let code = table
                .get(symbol)
                .ok_or(HuffmanError::MissingCode { symbol })?;
            for &bit in code.bits() {
                writer.write_bit(bit);
            }
        }

        self.valid_bits = writer.bit_len();
        self.table = Some(table);
        debug!(
            valid_bits = self.valid_bits,
            bytes = writer.byte_len(),
            "encoded input"
        );

        Ok(writer.finish())
    }

    /// Serialize the code table of the last successful `encode`.
    ///
    /// # Errors
    /// `HuffmanError::NoCodeTable` if `encode` has not succeeded yet.
    pub fn serialize_code_map(&self) -> Result<String> {
        match &self.table {
            Some(table) if !table.is_empty() => Ok(table.serialize(self.valid_bits)),
            _ => Err(HuffmanError::NoCodeTable.into()),
        }
    }

    /// The code table of the last successful `encode`.
    pub fn code_table(&self) -> Option<&CodeTable> {
        self.table.as_ref()
    }

    /// Number of meaningful bits produced by the last successful `encode`.
    pub fn valid_bits(&self) -> usize {
        self.valid_bits
    }
}
