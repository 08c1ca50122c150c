//! SMS segmentation.
//!
//! A concatenated GSM-7 message carries 153 characters per segment (160
//! minus the 7-character concatenation header). Text is cut into consecutive
//! segments of at most that many characters; joining them restores it.

use crate::error::{Error, Result};

/// Characters per concatenated GSM-7 segment.
pub const SEGMENT_LEN: usize = 153;

/// Split `text` into segments of at most `segment_len` characters.
///
/// Empty text yields no segments.
///
/// # Errors
/// `Error::Config` if `segment_len` is zero.
pub fn split_for_sms(text: &str, segment_len: usize) -> Result<Vec<&str>> {
    if segment_len == 0 {
        return Err(Error::Config("segment length must be positive".to_string()));
    }

    let mut segments = Vec::with_capacity(segment_count(text.chars().count(), segment_len));
    let mut start = 0;
    let mut chars = 0;
    for (index, _) in text.char_indices() {
        if chars == segment_len {
            segments.push(&text[start..index]);
            start = index;
            chars = 0;
        }
        chars += 1;
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    Ok(segments)
}

/// Number of segments needed for `char_len` characters.
///
/// Returns 0 when `segment_len` is zero.
pub fn segment_count(char_len: usize, segment_len: usize) -> usize {
    if segment_len == 0 {
        0
    } else {
        char_len.div_ceil(segment_len)
    }
}

/// Reassemble segments produced by [`split_for_sms`].
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().map(AsRef::as_ref).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_multiple() {
        let text = "A".repeat(SEGMENT_LEN * 2);
        let segments = split_for_sms(&text, SEGMENT_LEN).unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.len() == SEGMENT_LEN));
    }

    #[test]
    fn test_split_with_remainder() {
        let segments = split_for_sms("ABCDEFG", 3).unwrap();
        assert_eq!(segments, vec!["ABC", "DEF", "G"]);
        assert_eq!(join_segments(&segments), "ABCDEFG");
    }

    #[test]
    fn test_split_empty() {
        assert!(split_for_sms("", SEGMENT_LEN).unwrap().is_empty());
    }

    #[test]
    fn test_split_counts_characters() {
        let segments = split_for_sms("ééé", 2).unwrap();
        assert_eq!(segments, vec!["éé", "é"]);
    }

    #[test]
    fn test_zero_segment_len() {
        assert!(matches!(split_for_sms("A", 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count(0, SEGMENT_LEN), 0);
        assert_eq!(segment_count(1, SEGMENT_LEN), 1);
        assert_eq!(segment_count(153, SEGMENT_LEN), 1);
        assert_eq!(segment_count(154, SEGMENT_LEN), 2);
        assert_eq!(segment_count(10, 0), 0);
    }
}
