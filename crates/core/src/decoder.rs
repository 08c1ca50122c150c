//! Huffman decoder: serialized table plus packed bits back to text.
//!
//! The decoder is stateless; every call rebuilds its lookup structure from
//! the serialized table. Matching is greedy: a symbol is emitted as soon as
//! the accumulated bits name one. That is only unambiguous when the table is
//! a genuine prefix code, which the encoder guarantees but a tampered table
//! need not be. [`Strictness::PrefixFree`] rejects such tables up front.

use tracing::{debug, warn};

use crate::alphabet::first_invalid;
use crate::bitio::BitReader;
use crate::codetable::ParsedTable;
use crate::error::{HuffmanError, Result};
use crate::tree::Codeword;

/// How much the decoder trusts the table it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Accept any parseable table; duplicate codes keep the last symbol.
    #[default]
    Lenient,

    /// Reject tables in which a code is a prefix of, or equal to, another.
    PrefixFree,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    symbol: Option<char>,
}

/// Binary trie over the table's codes.
#[derive(Debug, Clone)]
struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    const ROOT: usize = 0;

    fn build(entries: &[(Codeword, char)]) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::default()],
        };
        for (code, symbol) in entries {
            trie.insert(code, *symbol);
        }
        trie
    }

    fn insert(&mut self, code: &Codeword, symbol: char) {
        let mut node = Self::ROOT;
        for &bit in code.bits() {
            let slot = usize::from(bit);
            node = match self.nodes[node].children[slot] {
                Some(child) => child,
                None => {
                    self.nodes.push(TrieNode::default());
                    let child = self.nodes.len() - 1;
                    self.nodes[node].children[slot] = Some(child);
                    child
                }
            };
        }
        if let Some(previous) = self.nodes[node].symbol.replace(symbol) {
            warn!(code = %code, ?previous, ?symbol, "duplicate code in table, keeping last");
        }
    }

    fn step(&self, node: usize, bit: bool) -> Option<usize> {
        self.nodes[node].children[usize::from(bit)]
    }

    fn symbol(&self, node: usize) -> Option<char> {
        self.nodes[node].symbol
    }
}

/// Stateless Huffman decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanDecoder {
    strictness: Strictness,
}

impl HuffmanDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Decode `encoded` using the serialized `table`.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyInput` if either argument is empty
    /// - any `TableError` from parsing (or prefix checking, when strict)
    /// - `HuffmanError::BitBudgetExceeded` if the table claims more bits
    ///   than `encoded` holds
    /// - `HuffmanError::IncompleteCode` if the bits end mid-code
    /// - `HuffmanError::EmptyDecodeResult` if no symbol was produced
    /// - `HuffmanError::InvalidAlphabetOutput` if the text is not Base64
    pub fn decode(&self, table: &str, encoded: &[u8]) -> Result<String> {
        if table.is_empty() || encoded.is_empty() {
            return Err(HuffmanError::EmptyInput.into());
        }

        let parsed = ParsedTable::parse(table)?;
        if self.strictness == Strictness::PrefixFree {
            parsed.check_prefix_free()?;
        }

        let available = encoded.len() * 8;
        if parsed.valid_bits > available {
            return Err(HuffmanError::BitBudgetExceeded {
                valid_bits: parsed.valid_bits,
                available,
            }
            .into());
        }

        let trie = DecodeTrie::build(&parsed.entries);
        let mut reader = BitReader::new(encoded);
        let mut decoded = String::new();
        let mut pending = String::new();
        // `None` once the pending bits have left the trie; they can never match.
        let mut cursor = Some(DecodeTrie::ROOT);

        for _ in 0..parsed.valid_bits {
            let bit = reader.read_bit()?;
            pending.push(if bit { '1' } else { '0' });
            cursor = cursor.and_then(|node| trie.step(node, bit));
            if let Some(symbol) = cursor.and_then(|node| trie.symbol(node)) {
                decoded.push(symbol);
                pending.clear();
                cursor = Some(DecodeTrie::ROOT);
            }
        }

        if !pending.is_empty() {
            return Err(HuffmanError::IncompleteCode { pending }.into());
        }
        if decoded.is_empty() {
            return Err(HuffmanError::EmptyDecodeResult.into());
        }
        if let Some((position, symbol)) = first_invalid(&decoded) {
            return Err(HuffmanError::InvalidAlphabetOutput { symbol, position }.into());
        }

        debug!(
            symbols = decoded.chars().count(),
            valid_bits = parsed.valid_bits,
            padding = reader.bits_remaining(),
            "decoded payload"
        );
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::HuffmanEncoder;
    use crate::error::{Error, TableError};

    fn encode(input: &str) -> (String, Vec<u8>) {
        let mut encoder = HuffmanEncoder::new();
        let bytes = encoder.encode(input).unwrap();
        (encoder.serialize_code_map().unwrap(), bytes)
    }

    #[test]
    fn test_decode_hand_built_table() {
        // A=0, B=10, C=11: "ABCA" -> 0 10 11 0 -> 0101_1000
        let decoded = HuffmanDecoder::new()
            .decode("6|A:0;B:10;C:11;", &[0b0101_1000])
            .unwrap();
        assert_eq!(decoded, "ABCA");
    }

    #[test]
    fn test_round_trip_concrete() {
        let (table, bytes) = encode("QUJD");
        assert_eq!(HuffmanDecoder::new().decode(&table, &bytes).unwrap(), "QUJD");
    }

    #[test]
    fn test_single_symbol_round_trip() {
        let (table, bytes) = encode("AAAA");
        assert_eq!(table, "4|A:0;");
        assert_eq!(HuffmanDecoder::new().decode(&table, &bytes).unwrap(), "AAAA");
    }

    #[test]
    fn test_padding_ignored() {
        // Trailing padding bits are all ones here; only six bits are valid.
        let decoded = HuffmanDecoder::new()
            .decode("6|A:0;B:10;C:11;", &[0b0101_1011])
            .unwrap();
        assert_eq!(decoded, "ABCA");
    }

    #[test]
    fn test_empty_arguments() {
        let decoder = HuffmanDecoder::new();
        assert!(matches!(
            decoder.decode("", &[0]),
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
        assert!(matches!(
            decoder.decode("1|A:0;", &[]),
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
    }

    #[test]
    fn test_bit_budget_exceeded() {
        let err = HuffmanDecoder::new()
            .decode("9|A:0;B:1;", &[0xFF])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::BitBudgetExceeded {
                valid_bits: 9,
                available: 8
            })
        ));
    }

    #[test]
    fn test_incomplete_code() {
        // "1" alone is not a code; it is the start of B or C.
        let err = HuffmanDecoder::new()
            .decode("2|A:0;B:10;C:11;", &[0b0100_0000])
            .unwrap_err();
        match err {
            Error::Huffman(HuffmanError::IncompleteCode { pending }) => assert_eq!(pending, "1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bits_outside_table_are_incomplete() {
        // Only "0" is known, so "1..." never resolves.
        let err = HuffmanDecoder::new()
            .decode("3|A:0;", &[0b0110_0000])
            .unwrap_err();
        match err {
            Error::Huffman(HuffmanError::IncompleteCode { pending }) => assert_eq!(pending, "11"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_valid_bits() {
        let err = HuffmanDecoder::new().decode("0|A:0;", &[0]).unwrap_err();
        assert!(matches!(err, Error::Huffman(HuffmanError::EmptyDecodeResult)));
    }

    #[test]
    fn test_invalid_alphabet_output() {
        // A=00 B=01 #=10 C=11: "AB#C" -> 00 01 10 11
        let err = HuffmanDecoder::new()
            .decode("8|A:00;B:01;#:10;C:11;", &[0b0001_1011])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::InvalidAlphabetOutput {
                symbol: '#',
                position: 2
            })
        ));
    }

    #[test]
    fn test_lenient_accepts_ambiguous_table() {
        // B=01 is unreachable behind A=0; greedy matching reads "01" as A then C.
        let decoder = HuffmanDecoder::new();
        let decoded = decoder.decode("2|A:0;B:01;C:1;", &[0b0100_0000]).unwrap();
        assert_eq!(decoded, "AC");
    }

    #[test]
    fn test_strict_rejects_ambiguous_table() {
        let decoder = HuffmanDecoder::with_strictness(Strictness::PrefixFree);
        let err = decoder
            .decode("2|A:0;B:01;C:1;", &[0b0100_0000])
            .unwrap_err();
        assert!(matches!(err, Error::Table(TableError::NotPrefixFree { .. })));
    }

    #[test]
    fn test_strict_accepts_encoder_output() {
        let input = "R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";
        let (table, bytes) = encode(input);
        let decoder = HuffmanDecoder::with_strictness(Strictness::PrefixFree);
        assert_eq!(decoder.decode(&table, &bytes).unwrap(), input);
    }

    #[test]
    fn test_duplicate_code_keeps_last() {
        let decoded = HuffmanDecoder::new()
            .decode("2|A:0;B:0;C:1;", &[0b0100_0000])
            .unwrap();
        assert_eq!(decoded, "BC");
    }

    #[test]
    fn test_trailing_backslash_in_table_is_skipped() {
        let decoded = HuffmanDecoder::new()
            .decode("2|A:0;B:1;\\", &[0b0100_0000])
            .unwrap();
        assert_eq!(decoded, "AB");
    }

    #[test]
    fn test_strictness_accessor() {
        assert_eq!(HuffmanDecoder::new().strictness(), Strictness::Lenient);
        assert_eq!(
            HuffmanDecoder::with_strictness(Strictness::PrefixFree).strictness(),
            Strictness::PrefixFree
        );
    }
}
