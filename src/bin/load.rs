//! tsbench Loader Binary
//!
//! Loads a generated file and reports throughput.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use tsbench::{Config, Encoding, Loader, ReadStrategy, TextErrorPolicy};

/// tsbench loader
#[derive(Parser, Debug)]
#[command(name = "tsbench-load")]
#[command(about = "Load a .pb or .tsd file and report points/s")]
#[command(version)]
struct Args {
    /// File to load (.tsd is read as text, anything else as binary)
    path: PathBuf,

    /// Read the whole binary file into memory before decoding
    #[arg(long)]
    in_memory: bool,

    /// Skip malformed text lines instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Streaming reader buffer capacity in bytes
    #[arg(long, default_value = "100000")]
    buffer_capacity: usize,

    /// Refill threshold in bytes
    #[arg(long, default_value = "10000")]
    low_water_mark: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tsbench=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("tsbench loader v{}", tsbench::VERSION);
    tracing::info!("Input: {}", args.path.display());

    let config = Config::builder()
        .buffer_capacity(args.buffer_capacity)
        .low_water_mark(args.low_water_mark)
        .read_strategy(if args.in_memory {
            ReadStrategy::InMemory
        } else {
            ReadStrategy::Streaming
        })
        .text_error_policy(if args.skip_malformed {
            TextErrorPolicy::Skip
        } else {
            TextErrorPolicy::Fail
        })
        .build();

    let loader = match Loader::new(config) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Invalid arguments: {}", e);
            std::process::exit(2);
        }
    };

    match loader.load_path(&args.path) {
        Ok(stats) => {
            let label = match stats.encoding {
                Encoding::PlainText => "loading TSD file",
                Encoding::Dictionary => "loading PB file",
            };
            println!(
                "{} : {} data points in {:.3}s ({:.1} points/s)",
                label,
                stats.records,
                stats.elapsed.as_secs_f64(),
                stats.points_per_sec()
            );
        }
        Err(e) => {
            tracing::error!("Load failed: {}", e);
            std::process::exit(1);
        }
    }
}
