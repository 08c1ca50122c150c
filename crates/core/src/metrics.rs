//! Metrics for one encode/decode run.
//!
//! Counts are filled in by the caller at each stage. The interesting figures
//! for SMS transport are how many bits each Base64 symbol costs after coding,
//! and how much of the output is the code table rather than payload.
//!
//! # Thread Safety
//!
//! `CodecMetrics` is a plain struct. Wrap it in a lock to share it.

use std::time::{Duration, Instant};

use crate::sms::{segment_count, SEGMENT_LEN};

/// Sizes, ratios and timing for one run of the coder.
///
/// Fields are public and filled in by the caller; derived figures are
/// computed on demand.
#[derive(Debug, Clone)]
pub struct CodecMetrics {
    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Input ===
    /// Symbols handed to the encoder
    pub input_symbols: u64,

    /// Distinct symbols, i.e. code table entries
    pub distinct_symbols: u64,

    // === Output ===
    /// Meaningful bits in the payload
    pub valid_bits: u64,

    /// Packed payload bytes
    pub payload_bytes: u64,

    /// Length of the serialized code table in characters
    pub table_chars: u64,

    /// Length of the SMS text form of the whole message
    pub sms_chars: u64,

    // === Decode ===
    /// Symbols recovered by the decoder
    pub decoded_symbols: u64,

    /// Whether the decoded text equals the input, once checked
    pub round_trip_ok: Option<bool>,
}

impl CodecMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_symbols: 0,
            distinct_symbols: 0,
            valid_bits: 0,
            payload_bytes: 0,
            table_chars: 0,
            sms_chars: 0,
            decoded_symbols: 0,
            round_trip_ok: None,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration, or elapsed time so far if not complete.
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Average code length. A raw Base64 symbol costs 8 bits as a byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            self.valid_bits as f64 / self.input_symbols as f64
        }
    }

    /// Payload bytes per input symbol.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            self.payload_bytes as f64 / self.input_symbols as f64
        }
    }

    /// Payload plus table, per input symbol.
    pub fn total_ratio(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            (self.payload_bytes + self.table_chars) as f64 / self.input_symbols as f64
        }
    }

    /// SMS segments needed to send the input text as-is.
    pub fn input_segments(&self) -> usize {
        segment_count(self.input_symbols as usize, SEGMENT_LEN)
    }

    /// SMS segments needed for the serialized table alone.
    pub fn table_segments(&self) -> usize {
        segment_count(self.table_chars as usize, SEGMENT_LEN)
    }

    /// SMS segments needed for the encoded message in text form.
    pub fn sms_segments(&self) -> usize {
        segment_count(self.sms_chars as usize, SEGMENT_LEN)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Codec Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Input ===");
        println!("Symbols: {}", self.input_symbols);
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("SMS segments (raw): {}", self.input_segments());
        println!();

        println!("=== Output ===");
        println!("Valid bits: {}", self.valid_bits);
        println!("Payload: {} bytes", self.payload_bytes);
        println!("Code table: {} chars ({} segments)", self.table_chars, self.table_segments());
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!("Ratio (payload): {:.1}%", self.compression_ratio() * 100.0);
        println!("Ratio (payload + table): {:.1}%", self.total_ratio() * 100.0);
        if self.sms_chars > 0 {
            println!("SMS text: {} chars ({} segments)", self.sms_chars, self.sms_segments());
        }
        println!();

        if let Some(ok) = self.round_trip_ok {
            println!("=== Decode ===");
            println!("Decoded symbols: {}", self.decoded_symbols);
            if ok {
                println!("Verification: PASSED ✓");
            } else {
                println!("Verification: FAILED ✗ (decoded text differs)");
            }
            println!();
        }
    }

    /// Export metrics as key=value lines.
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_symbols={}\n\
             distinct_symbols={}\n\
             valid_bits={}\n\
             payload_bytes={}\n\
             table_chars={}\n\
             sms_chars={}\n\
             decoded_symbols={}\n\
             round_trip_ok={}\n\
             bits_per_symbol={:.4}\n\
             compression_ratio={:.4}\n\
             total_ratio={:.4}\n",
            self.duration().as_millis(),
            self.input_symbols,
            self.distinct_symbols,
            self.valid_bits,
            self.payload_bytes,
            self.table_chars,
            self.sms_chars,
            self.decoded_symbols,
            self.round_trip_ok
                .map_or_else(|| "unchecked".to_string(), |ok| ok.to_string()),
            self.bits_per_symbol(),
            self.compression_ratio(),
            self.total_ratio(),
        )
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = CodecMetrics::new();
        assert!(metrics.end_time.is_none());
        assert_eq!(metrics.bits_per_symbol(), 0.0);
        assert_eq!(metrics.compression_ratio(), 0.0);
        assert_eq!(metrics.round_trip_ok, None);
    }

    #[test]
    fn test_ratios() {
        let mut metrics = CodecMetrics::new();
        metrics.input_symbols = 100;
        metrics.valid_bits = 600;
        metrics.payload_bytes = 75;
        metrics.table_chars = 25;

        assert_eq!(metrics.bits_per_symbol(), 6.0);
        assert_eq!(metrics.compression_ratio(), 0.75);
        assert_eq!(metrics.total_ratio(), 1.0);
    }

    #[test]
    fn test_segments() {
        let mut metrics = CodecMetrics::new();
        metrics.input_symbols = 306;
        metrics.table_chars = 154;
        metrics.sms_chars = 460;
        assert_eq!(metrics.input_segments(), 2);
        assert_eq!(metrics.table_segments(), 2);
        assert_eq!(metrics.sms_segments(), 4);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut metrics = CodecMetrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = CodecMetrics::new();
        metrics.input_symbols = 12;
        metrics.decoded_symbols = 12;
        metrics.payload_bytes = 5;

        let text = metrics.export_text();
        assert!(text.contains("input_symbols=12"));
        assert!(text.contains("decoded_symbols=12"));
        assert!(text.contains("payload_bytes=5"));
        assert!(text.contains("round_trip_ok=unchecked"));
    }

    #[test]
    fn test_failed_round_trip_is_exported() {
        let mut metrics = CodecMetrics::new();
        metrics.input_symbols = 4;
        metrics.decoded_symbols = 4;
        metrics.round_trip_ok = Some(false);

        assert!(metrics.export_text().contains("round_trip_ok=false"));
    }
}
