//! The Base64 transport alphabet: `A-Z a-z 0-9 + / =`.
//!
//! The encoder only warns about symbols outside this set. The decoder rejects
//! output that contains one, since its consumer is always a Base64 decoder.

/// Returns true for characters of the standard Base64 alphabet, padding included.
pub fn is_base64_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

/// Find the first character outside the Base64 alphabet.
///
/// The position is a character index, not a byte offset.
pub fn first_invalid(text: &str) -> Option<(usize, char)> {
    text.chars()
        .enumerate()
        .find(|&(_, c)| !is_base64_symbol(c))
}
