//! Code table serialization and parsing.
//!
//! # Wire Format
//!
//! ```text
//! {valid_bits}|{symbol}:{code};{symbol}:{code};...;
//! ```
//!
//! - `valid_bits` is a non-negative decimal integer with no sign.
//! - `code` is a non-empty string over `0`/`1`.
//! - In the symbol field, `\`, `:`, `;` and `|` are written as `\\`, `\:`,
//!   `\;` and `\|`.
//!
//! Parsing is escape-aware: a backslash always takes the following character
//! with it, so `\\;` is an escaped backslash followed by an entry separator
//! rather than an escaped semicolon.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::alphabet::is_base64_symbol;
use crate::error::{Result, TableError};
use crate::tree::Codeword;

const ESCAPE: char = '\\';
const HEADER_SEPARATOR: char = '|';
const ENTRY_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ':';

/// Mapping from symbol to its prefix code, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, Codeword>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: char, code: Codeword) {
        self.codes.insert(symbol, code);
    }

    pub fn get(&self, symbol: char) -> Option<&Codeword> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Codeword)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Render the table in wire format with `valid_bits` as its header.
    pub fn serialize(&self, valid_bits: usize) -> String {
        let mut out = String::new();
        out.push_str(&valid_bits.to_string());
        out.push(HEADER_SEPARATOR);
        for (symbol, code) in self.iter() {
            escape_symbol(symbol, &mut out);
            out.push(FIELD_SEPARATOR);
            out.push_str(&code.to_string());
            out.push(ENTRY_SEPARATOR);
        }
        out
    }
}

fn escape_symbol(symbol: char, out: &mut String) {
    if matches!(symbol, ESCAPE | FIELD_SEPARATOR | ENTRY_SEPARATOR | HEADER_SEPARATOR) {
        out.push(ESCAPE);
    }
    out.push(symbol);
}

/// Reverse `escape_symbol`. Backslashes in front of other characters are kept.
fn unescape_symbol(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(&next) = chars.peek() {
                if matches!(next, ESCAPE | FIELD_SEPARATOR | ENTRY_SEPARATOR | HEADER_SEPARATOR) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Split `s` on every `separator` that is not consumed by an escape.
///
/// A trailing lone backslash stays in the last part.
fn split_unescaped(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = s.char_indices();
    while let Some((index, c)) = chars.next() {
        if c == ESCAPE {
            chars.next();
        } else if c == separator {
            parts.push(&s[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split `s` at the first `separator` not consumed by an escape.
fn split_once_unescaped(s: &str, separator: char) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    while let Some((index, c)) = chars.next() {
        if c == ESCAPE {
            chars.next();
        } else if c == separator {
            return Some((&s[..index], &s[index + c.len_utf8()..]));
        }
    }
    None
}

fn parse_bit_count(field: &str) -> Result<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TableError::InvalidBitCount(field.to_string()).into());
    }
    let bits = field
        .parse::<usize>()
        .map_err(|_| TableError::InvalidBitCount(field.to_string()))?;
    Ok(bits)
}

/// A code table as read back from its wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Number of meaningful bits in the accompanying payload
    pub valid_bits: usize,

    /// Entries in table order; later duplicates of a code win
    pub entries: Vec<(Codeword, char)>,
}

impl ParsedTable {
    /// Parse a serialized table.
    ///
    /// Entries without a `:`, with an invalid code, or whose symbol does not
    /// unescape to exactly one character are skipped with a warning. A
    /// trailing lone `\` counts as an entry without a `:`.
    ///
    /// # Errors
    /// - `TableError::MissingBitCount` if there is no `|`
    /// - `TableError::InvalidBitCount` if the header is not a decimal integer
    /// - `TableError::EmptyCodeMap` if no entry survives
    pub fn parse(serialized: &str) -> Result<Self> {
        let (header, body) = serialized
            .split_once(HEADER_SEPARATOR)
            .ok_or(TableError::MissingBitCount)?;
        let valid_bits = parse_bit_count(header)?;

        let mut entries = Vec::new();
        for pair in split_unescaped(body, ENTRY_SEPARATOR) {
            if pair.is_empty() {
                continue;
            }
            let Some((symbol_field, code_field)) = split_once_unescaped(pair, FIELD_SEPARATOR)
            else {
                warn!(entry = pair, "skipping code table entry without ':'");
                continue;
            };
            let code: Codeword = match code_field.parse() {
                Ok(code) => code,
                Err(err) => {
                    warn!(entry = pair, %err, "skipping code table entry");
                    continue;
                }
            };
            let symbol = unescape_symbol(symbol_field);
            let mut chars = symbol.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                warn!(symbol = %symbol, "skipping code table entry: symbol is not one character");
                continue;
            };
            if !is_base64_symbol(c) {
                warn!(symbol = ?c, "non-Base64 symbol in code table");
            }
            entries.push((code, c));
        }

        if entries.is_empty() {
            return Err(TableError::EmptyCodeMap.into());
        }
        debug!(entries = entries.len(), valid_bits, "parsed code table");

        Ok(Self {
            valid_bits,
            entries,
        })
    }

    /// Check that no code is a prefix of, or equal to, another code.
    pub fn check_prefix_free(&self) -> Result<()> {
        let mut codes: Vec<&Codeword> = self.entries.iter().map(|(code, _)| code).collect();
        // After sorting, any prefix relation shows up between neighbours.
        codes.sort();
        for pair in codes.windows(2) {
            if pair[0].is_prefix_of(pair[1]) {
                return Err(TableError::NotPrefixFree {
                    code: pair[0].to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}
