//! Command-line configuration for the smsto tool.
//!
//! Every command that needs input text can run without any: a reproducible
//! sample is generated from a seed, and the seed is printed so the run can
//! be repeated exactly.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand, ValueEnum};
use smsto_core::sms::SEGMENT_LEN;
use smsto_core::{Compression, Strictness};

/// Default length of generated sample text, in Base64 symbols
pub const DEFAULT_SAMPLE_LEN: usize = 4096;

/// Container path used by `encode` when `--out` is absent
pub const DEFAULT_CONTAINER_PATH: &str = "./out.smsh";

#[derive(Parser, Debug)]
#[command(name = "smsto")]
#[command(version)]
#[command(about = "Huffman-code Base64 text into SMS-sized payloads and back", long_about = None)]
#[command(after_help = "\
EXAMPLES:
    smsto roundtrip                          # Random sample, verify round trip
    smsto roundtrip --seed 42 --gzip         # Deterministic run via SMS text
    smsto encode --in image.b64 --out msg.smsh
    smsto encode --in image.b64 --format sms --gzip > msg.txt
    smsto decode --in msg.txt --out image.b64
    smsto segment --in msg.smsh
    smsto sample --out sample.b64 --seed 7")]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode Base64 text into a binary container or SMS text
    Encode(EncodeArgs),

    /// Decode a container or pasted SMS text back into Base64 text
    Decode(DecodeArgs),

    /// Convert an encoded message into SMS segments
    Segment(SegmentArgs),

    /// Encode and decode a sample, verifying the result
    Roundtrip(RoundtripArgs),

    /// Write a generated Base64 sample to a file
    Sample(SampleFileArgs),
}

/// Where input text comes from when no file is given.
#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// Seed for the generated sample (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Length of the generated sample in symbols
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LEN)]
    pub sample_len: usize,
}

/// How the SMS text form is produced.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Gzip the container before Base64
    #[arg(long)]
    pub gzip: bool,

    /// Characters per SMS segment
    #[arg(long, default_value_t = SEGMENT_LEN)]
    pub segment_len: usize,
}

impl TransportArgs {
    pub fn compression(&self) -> Compression {
        if self.gzip {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// Output of the `encode` command.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Binary container
    #[default]
    Container,

    /// Base64 text, one SMS segment per line
    Sms,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Base64 text file (default: generate a sample)
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// Output path (default: ./out.smsh for a container, stdout for SMS text)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Container)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub sample: SampleArgs,

    #[command(flatten)]
    pub transport: TransportArgs,

    /// Don't print the metrics summary
    #[arg(long)]
    pub no_metrics: bool,

    /// Write metrics as key=value lines to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Container or SMS text produced by `encode`
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output text path (default: stdout)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    /// Reject code tables that are not prefix-free
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Container or SMS text produced by `encode`
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output path (default: stdout)
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub transport: TransportArgs,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// Base64 text file (default: generate a sample)
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub sample: SampleArgs,

    #[command(flatten)]
    pub transport: TransportArgs,

    /// Reject code tables that are not prefix-free
    #[arg(long)]
    pub strict: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long)]
    pub no_metrics: bool,

    /// Write metrics as key=value lines to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SampleFileArgs {
    /// Output text path
    #[arg(long = "out")]
    pub output: PathBuf,

    #[command(flatten)]
    pub sample: SampleArgs,
}

/// Resolved settings for a run that encodes text.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file path (None = generate sample)
    pub input_file: Option<PathBuf>,

    /// Seed for sample generation
    pub seed: u64,

    /// Sample length in symbols
    pub sample_len: usize,

    /// Decoder strictness
    pub strictness: Strictness,

    /// Compression applied before Base64 in the SMS text form
    pub compression: Compression,

    /// Characters per SMS segment
    pub segment_len: usize,

    /// Print the metrics summary after the run
    pub print_metrics: bool,
}

impl Config {
    /// Resolve the seed (explicit or time-based) and the decoder mode.
    pub fn resolve(
        input_file: Option<PathBuf>,
        sample: &SampleArgs,
        strict: bool,
        print_metrics: bool,
    ) -> Self {
        Self {
            input_file,
            seed: sample.seed.unwrap_or_else(time_seed),
            sample_len: sample.sample_len,
            strictness: if strict {
                Strictness::PrefixFree
            } else {
                Strictness::Lenient
            },
            compression: Compression::None,
            segment_len: SEGMENT_LEN,
            print_metrics,
        }
    }

    /// Apply SMS text settings.
    pub fn with_transport(mut self, transport: &TransportArgs) -> Self {
        self.compression = transport.compression();
        self.segment_len = transport.segment_len;
        self
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input_file {
            Some(path) => println!("Input file: {}", path.display()),
            None => {
                println!("Input file: (generate sample)");
                println!("Seed: {}", self.seed);
                println!("Sample length: {} symbols", self.sample_len);
            }
        }
        println!("Decoder: {:?}", self.strictness);
        println!("Compression: {:?}", self.compression);
        println!("Segment length: {} chars", self.segment_len);
        println!();
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
