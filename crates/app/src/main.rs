//! smsto: Huffman-code Base64 text for SMS transport.

mod config;
mod input_gen;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use smsto_core::framing::serialize_frame;
use smsto_core::metrics::CodecMetrics;
use smsto_core::transport::{from_segments, read_message, to_segments};
use smsto_core::{Compression, EncodedMessage, HuffmanDecoder, HuffmanEncoder, Strictness};

use config::{
    Cli, Command, Config, DecodeArgs, EncodeArgs, OutputFormat, RoundtripArgs, SampleFileArgs,
    SegmentArgs, DEFAULT_CONTAINER_PATH,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Encode(args) => cmd_encode(&args),
        Command::Decode(args) => cmd_decode(&args),
        Command::Segment(args) => cmd_segment(&args),
        Command::Roundtrip(args) => cmd_roundtrip(&args),
        Command::Sample(args) => cmd_sample(&args),
    }
}

/// Read Base64 text, dropping line breaks and other whitespace.
fn read_text(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(raw.split_whitespace().collect())
}

fn load_input(config: &Config) -> Result<String> {
    match &config.input_file {
        Some(path) => read_text(path),
        None => {
            info!(seed = config.seed, len = config.sample_len, "generating sample input");
            Ok(input_gen::generate_sample_base64(config.seed, config.sample_len))
        }
    }
}

/// Encode `text`, recording sizes in `metrics`.
fn encode_text(text: &str, metrics: &mut CodecMetrics) -> Result<EncodedMessage> {
    let mut encoder = HuffmanEncoder::new();
    let payload = encoder.encode(text).context("Huffman encoding failed")?;
    let table = encoder.serialize_code_map()?;

    metrics.input_symbols = text.chars().count() as u64;
    metrics.distinct_symbols = encoder.code_table().map_or(0, |t| t.len()) as u64;
    metrics.valid_bits = encoder.valid_bits() as u64;
    metrics.payload_bytes = payload.len() as u64;
    metrics.table_chars = table.chars().count() as u64;

    Ok(EncodedMessage { table, payload })
}

/// Render `message` as SMS segments, recording the text length.
fn pack_for_sms(
    message: &EncodedMessage,
    compression: Compression,
    segment_len: usize,
    metrics: &mut CodecMetrics,
) -> Result<Vec<String>> {
    let segments = to_segments(message, compression, segment_len)
        .context("Failed to pack message as SMS text")?;
    metrics.sms_chars = segments.iter().map(|s| s.chars().count() as u64).sum();
    Ok(segments)
}

/// Write segments one per line to `path`, or to stdout.
fn write_segments(segments: &[String], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut text = segments.join("\n");
            text.push('\n');
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), segments = segments.len(), "wrote SMS text");
        }
        None => {
            for segment in segments {
                println!("{segment}");
            }
        }
    }
    Ok(())
}

fn report(print_summary: bool, metrics: &CodecMetrics, metrics_out: Option<&Path>) -> Result<()> {
    if print_summary {
        metrics.print_summary();
    }
    if let Some(path) = metrics_out {
        std::fs::write(path, metrics.export_text())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote metrics");
    }
    Ok(())
}

fn read_message_file(path: &Path) -> Result<EncodedMessage> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    read_message(&data).with_context(|| format!("Invalid message in {}", path.display()))
}

fn cmd_encode(args: &EncodeArgs) -> Result<()> {
    let config = Config::resolve(args.input.clone(), &args.sample, false, !args.no_metrics)
        .with_transport(&args.transport);
    let text = load_input(&config)?;

    let mut metrics = CodecMetrics::new();
    let message = encode_text(&text, &mut metrics)?;
    let segments = pack_for_sms(&message, config.compression, config.segment_len, &mut metrics)?;

    match args.format {
        OutputFormat::Container => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTAINER_PATH));
            let frame = serialize_frame(&message)?;
            std::fs::write(&path, &frame)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = frame.len(), "wrote container");
        }
        OutputFormat::Sms => write_segments(&segments, args.output.as_deref())?,
    }
    metrics.complete();

    // Stdout carries the message itself in SMS mode.
    let stdout_free = args.format == OutputFormat::Container || args.output.is_some();
    let print_summary = config.print_metrics && stdout_free;
    if print_summary && config.input_file.is_none() {
        config.print();
    }
    report(print_summary, &metrics, args.metrics_out.as_deref())
}

fn cmd_decode(args: &DecodeArgs) -> Result<()> {
    let message = read_message_file(&args.input)?;

    let strictness = if args.strict {
        Strictness::PrefixFree
    } else {
        Strictness::Lenient
    };
    let decoder = HuffmanDecoder::with_strictness(strictness);
    debug!(strictness = ?decoder.strictness(), table_len = message.table.len(), "decoding message");
    let text = decoder
        .decode(&message.table, &message.payload)
        .context("Huffman decoding failed")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), symbols = text.len(), "wrote decoded text");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_segment(args: &SegmentArgs) -> Result<()> {
    let message = read_message_file(&args.input)?;

    let mut metrics = CodecMetrics::new();
    let segments = pack_for_sms(
        &message,
        args.transport.compression(),
        args.transport.segment_len,
        &mut metrics,
    )?;
    write_segments(&segments, args.output.as_deref())?;
    debug!(
        segments = segments.len(),
        chars = metrics.sms_chars,
        "split message"
    );
    Ok(())
}

fn cmd_roundtrip(args: &RoundtripArgs) -> Result<()> {
    let config = Config::resolve(args.input.clone(), &args.sample, args.strict, !args.no_metrics)
        .with_transport(&args.transport);
    if args.print_config {
        config.print();
    }
    let text = load_input(&config)?;

    let mut metrics = CodecMetrics::new();
    let message = encode_text(&text, &mut metrics)?;
    let segments = pack_for_sms(&message, config.compression, config.segment_len, &mut metrics)?;
    let received = from_segments(&segments).context("Failed to unpack SMS text")?;
    let decoded = HuffmanDecoder::with_strictness(config.strictness)
        .decode(&received.table, &received.payload)
        .context("Huffman decoding failed")?;
    metrics.decoded_symbols = decoded.chars().count() as u64;
    metrics.round_trip_ok = Some(decoded == text);
    metrics.complete();

    report(config.print_metrics, &metrics, args.metrics_out.as_deref())?;
    if decoded != text {
        bail!("Round trip mismatch (seed {})", config.seed);
    }
    println!(
        "✓ Round trip succeeded: {} symbols in {} SMS segments",
        metrics.input_symbols,
        segments.len()
    );
    Ok(())
}

fn cmd_sample(args: &SampleFileArgs) -> Result<()> {
    let config = Config::resolve(None, &args.sample, false, false);
    input_gen::write_sample_file(&args.output, config.seed, config.sample_len)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Wrote {} symbols to {} (seed {})",
        config.sample_len,
        args.output.display(),
        config.seed
    );
    Ok(())
}
