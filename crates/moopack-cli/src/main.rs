//! `moopack` CLI — build, inspect, and size MooMoo packets from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to packet bytes (stdin → stdout)
//! echo '["6",["hello"]]' | moopack encode > chat.bin
//!
//! # Encode to a hex dump instead of raw bytes
//! echo '{"a":1}' | moopack encode --hex
//! # 81a16101
//!
//! # Decode a captured packet to pretty-printed JSON
//! moopack decode -i chat.bin
//!
//! # Decode a hex dump copied from the browser devtools
//! echo '93 01 02 03' | moopack decode --hex
//!
//! # Decode a capture holding several concatenated packets
//! moopack decode --all -i capture.bin
//!
//! # Compare JSON and packet sizes
//! moopack stats -i data.json
//! ```
//!
//! Logging goes to stderr. `-v` enables debug output, `-vv` trace output;
//! `RUST_LOG` overrides both.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moopack_core::Value;
use std::io::{self, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moopack", version, about = "MooMoo MessagePack packet CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to packet bytes
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write a lowercase hex dump instead of raw bytes
        #[arg(long)]
        hex: bool,
    },
    /// Decode packet bytes to JSON
    Decode {
        /// Input packet file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Treat the input as a hex dump (whitespace ignored)
        #[arg(long)]
        hex: bool,
        /// Decode every concatenated value into a JSON array
        #[arg(long)]
        all: bool,
    },
    /// Show encoding statistics (JSON size vs. packet size)
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode { input, output, hex } => {
            let json = read_text(input.as_deref())?;
            let bytes =
                moopack_core::encode_json(&json).context("Failed to encode JSON to packet")?;
            debug!(len = bytes.len(), "encoded packet");
            if hex {
                write_output(output.as_deref(), to_hex(&bytes).as_bytes())?;
            } else {
                write_output(output.as_deref(), &bytes)?;
            }
        }
        Commands::Decode {
            input,
            output,
            hex,
            all,
        } => {
            let raw = read_bytes(input.as_deref())?;
            let bytes = if hex {
                let text = String::from_utf8(raw).context("Hex input is not valid UTF-8")?;
                parse_hex(&text)?
            } else {
                raw
            };
            let value = if all {
                Value::Array(
                    moopack_core::decode_all(&bytes).context("Failed to decode packets")?,
                )
            } else {
                moopack_core::decode(&bytes).context("Failed to decode packet")?
            };
            debug!(kind = value.type_name(), len = bytes.len(), "decoded packet");
            let json = value.to_json().context("Failed to render JSON")?;
            let pretty = serde_json::to_string_pretty(&json)?;
            write_output(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Stats { input } => {
            let json = read_text(input.as_deref())?;
            let bytes =
                moopack_core::encode_json(&json).context("Failed to encode JSON to packet")?;
            let compact: serde_json::Value = serde_json::from_str(&json)?;
            let json_bytes = serde_json::to_string(&compact)?.len();
            let packet_bytes = bytes.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (packet_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:    {} bytes", json_bytes);
            println!("Packet size:  {} bytes", packet_bytes);
            println!("Reduction:    {:.1}%", ratio);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a hex dump such as `93 01 02 03`, `0x93010203` or `0x93 0x01`.
fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .split_ascii_whitespace()
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .flat_map(str::bytes)
        .collect();
    if digits.len() % 2 != 0 {
        anyhow::bail!("Hex input has an odd number of digits ({})", digits.len());
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).context("Invalid hex digit")?;
            u8::from_str_radix(s, 16).with_context(|| format!("Invalid hex byte: '{}'", s))
        })
        .collect()
}

fn read_text(path: Option<&str>) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

fn read_bytes(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
