//! tsbench Generator Binary
//!
//! Writes a synthetic data file in either encoding.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use tsbench::{Encoding, Generator, GeneratorConfig};

/// tsbench data generator
#[derive(Parser, Debug)]
#[command(name = "tsbench-generate")]
#[command(about = "Generate synthetic time-series data")]
#[command(version)]
struct Args {
    /// Metric name (also the output file stem)
    metric: String,

    /// Number of days of data
    #[arg(default_value = "1")]
    days: u32,

    /// Points per hour
    #[arg(default_value = "3600")]
    pph: u32,

    /// Write text lines (.tsd) instead of the dictionary-encoded binary (.pb)
    #[arg(long)]
    tsd: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Number of distinct metric names
    #[arg(long, default_value = "1")]
    metrics: u32,

    /// Tag keys per point
    #[arg(long, default_value = "1")]
    tag_keys: u32,

    /// Distinct values per tag key
    #[arg(long, default_value = "1")]
    tag_values: u32,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
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

    let encoding = if args.tsd {
        Encoding::PlainText
    } else {
        Encoding::Dictionary
    };

    tracing::info!("tsbench generator v{}", tsbench::VERSION);
    tracing::info!(
        "Metric: {}, days: {}, pph: {}, encoding: {:?}",
        args.metric,
        args.days,
        args.pph,
        encoding
    );

    let config = GeneratorConfig {
        metric: args.metric,
        days: args.days,
        points_per_hour: args.pph,
        metrics: args.metrics,
        tag_keys: args.tag_keys,
        tag_values: args.tag_values,
        seed: args.seed,
    };

    let mut generator = match Generator::new(config) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Invalid arguments: {}", e);
            std::process::exit(2);
        }
    };

    match generator.generate_file(&args.out, encoding) {
        Ok(stats) => {
            println!(
                "Total time to create {} data points: {}ms",
                stats.records,
                stats.elapsed.as_millis()
            );
        }
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    }
}
