//! Huffman tree construction and code assignment.
//!
//! The tree lives in an arena (`Vec<Node>`) with index-based children and is
//! dropped as soon as the code table has been derived from it. Leaves are
//! allocated first, in first-occurrence order of their symbols, and every
//! merged node gets the next free index. The min-queue is keyed on
//! `(weight, index)`, which makes construction fully deterministic for a
//! given input.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::codetable::CodeTable;
use crate::error::{HuffmanError, Result, TableError};

/// A prefix code: a non-empty sequence of bits, first bit = edge out of the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codeword {
    bits: Vec<bool>,
}

impl Codeword {
    /// The code given to the only symbol of a single-symbol input.
    pub fn single() -> Self {
        Self { bits: vec![false] }
    }

    /// Build a codeword from raw bits. Returns `None` for an empty slice.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        if bits.is_empty() {
            None
        } else {
            Some(Self {
                bits: bits.to_vec(),
            })
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Codeword {
    type Err = TableError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(TableError::InvalidCode(s.to_string())),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Codeword::from_bits(&bits).ok_or_else(|| TableError::InvalidCode(s.to_string()))
    }
}

/// Count symbol occurrences, preserving first-occurrence order.
pub fn count_frequencies(text: &str) -> Vec<(char, u64)> {
    let mut slots: HashMap<char, usize> = HashMap::new();
    let mut counts: Vec<(char, u64)> = Vec::new();
    for c in text.chars() {
        match slots.get(&c) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(c, counts.len());
                counts.push((c, 1));
            }
        }
    }
    counts
}

#[derive(Debug, Clone)]
enum Node {
    Leaf { symbol: char, weight: u64 },
    Internal { weight: u64, left: usize, right: usize },
}

impl Node {
    fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }
}

/// A Huffman tree over `char` symbols.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree from the symbol distribution of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_frequencies(&count_frequencies(text))
    }

    /// Build a tree from `(symbol, weight)` pairs. Zero weights are ignored.
    ///
    /// # Errors
    /// `HuffmanError::EmptyInput` if no symbol has a non-zero weight.
    pub fn from_frequencies(frequencies: &[(char, u64)]) -> Result<Self> {
        let mut nodes: Vec<Node> = frequencies
            .iter()
            .filter(|&&(_, weight)| weight > 0)
            .map(|&(symbol, weight)| Node::Leaf { symbol, weight })
            .collect();
        if nodes.is_empty() {
            return Err(HuffmanError::EmptyInput.into());
        }

        let mut queue: BinaryHeap<Reverse<(u64, usize)>> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Reverse((node.weight(), index)))
            .collect();

        while queue.len() > 1 {
            let (Some(Reverse((lw, left))), Some(Reverse((rw, right)))) = (queue.pop(), queue.pop())
            else {
                break;
            };
            let weight = lw + rw;
            nodes.push(Node::Internal { weight, left, right });
            queue.push(Reverse((weight, nodes.len() - 1)));
        }

        let root = queue
            .pop()
            .map(|Reverse((_, index))| index)
            .ok_or(HuffmanError::EmptyInput)?;

        Ok(Self { nodes, root })
    }

    /// Number of distinct symbols (leaves).
    pub fn symbol_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Total weight, i.e. the input length the tree was built from.
    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Derive the code table: left edge = `0`, right edge = `1`.
    ///
    /// A tree that is a single leaf gives its symbol the code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();

        if let Node::Leaf { symbol, .. } = self.nodes[self.root] {
            table.insert(symbol, Codeword::single());
            return table;
        }

        let mut stack: Vec<(usize, Vec<bool>)> = vec![(self.root, Vec::new())];
        while let Some((index, prefix)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { symbol, .. } => {
                    if let Some(code) = Codeword::from_bits(&prefix) {
                        table.insert(symbol, code);
                    }
                }
                Node::Internal { left, right, .. } => {
                    let mut left_bits = prefix.clone();
                    left_bits.push(false);
                    let mut right_bits = prefix;
                    right_bits.push(true);
                    stack.push((right, right_bits));
                    stack.push((left, left_bits));
                }
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_prefix_free(table: &CodeTable) {
        let codes: Vec<&Codeword> = table.iter().map(|(_, code)| code).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_count_frequencies_first_occurrence_order() {
        let freqs = count_frequencies("QUJDQQ");
        assert_eq!(freqs, vec![('Q', 3), ('U', 1), ('J', 1), ('D', 1)]);
    }

    #[test]
    fn test_single_symbol_gets_code_zero() {
        let tree = HuffmanTree::from_text("AAAA").unwrap();
        let table = tree.code_table();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get('A').unwrap().to_string(), "0");
        assert_eq!(tree.total_weight(), 4);
    }

    #[test]
    fn test_two_symbols_get_one_bit_each() {
        let table = HuffmanTree::from_text("ABBB").unwrap().code_table();
        assert_eq!(table.get('A').unwrap().len(), 1);
        assert_eq!(table.get('B').unwrap().len(), 1);
        assert_ne!(table.get('A'), table.get('B'));
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let text = format!("{}{}{}{}", "A".repeat(50), "B".repeat(20), "C".repeat(5), "D");
        let table = HuffmanTree::from_text(&text).unwrap().code_table();

        assert!(table.get('A').unwrap().len() <= table.get('B').unwrap().len());
        assert!(table.get('B').unwrap().len() <= table.get('C').unwrap().len());
        assert!(table.get('C').unwrap().len() <= table.get('D').unwrap().len());
        assert_prefix_free(&table);
    }

    #[test]
    fn test_full_base64_alphabet_is_prefix_free() {
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";
        let table = HuffmanTree::from_text(alphabet).unwrap().code_table();

        assert_eq!(table.len(), 65);
        assert_prefix_free(&table);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let text = "SGVsbG8gV29ybGQhIEhlbGxvIFdvcmxkIQ==";
        let a = HuffmanTree::from_text(text).unwrap().code_table();
        let b = HuffmanTree::from_text(text).unwrap().code_table();
        assert_eq!(a, b);
    }

    #[test]
    fn test_node_marker_characters_are_symbols() {
        let table = HuffmanTree::from_text("\0\0A").unwrap().code_table();
        assert_eq!(table.len(), 2);
        assert!(table.get('\0').is_some());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(HuffmanTree::from_text("").is_err());
        assert!(HuffmanTree::from_frequencies(&[('A', 0)]).is_err());
    }

    #[test]
    fn test_codeword_parse() {
        let code: Codeword = "0110".parse().unwrap();
        assert_eq!(code.bits(), &[false, true, true, false]);
        assert_eq!(code.to_string(), "0110");

        assert!("".parse::<Codeword>().is_err());
        assert!("012".parse::<Codeword>().is_err());
    }

    #[test]
    fn test_codeword_prefix() {
        let short: Codeword = "01".parse().unwrap();
        let long: Codeword = "011".parse().unwrap();
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(short.is_prefix_of(&short));
    }
}
