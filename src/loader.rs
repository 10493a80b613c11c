//! Loader Module
//!
//! Reads a whole file in either encoding and counts its records.
//!
//! ## Responsibilities
//! - Pick the decoder from the file extension (`.tsd` is text)
//! - Pick streaming or in-memory decoding for binary files
//! - Apply the text error policy
//! - Report counts and throughput

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{Config, Encoding, ReadStrategy, TextErrorPolicy};
use crate::error::Result;
use crate::stream::{FrameScanner, StreamReader};
use crate::text::LineParser;

/// Outcome of a load pass
#[derive(Debug, Clone)]
pub struct LoadStats {
    /// Encoding of the loaded input
    pub encoding: Encoding,

    /// Records decoded successfully
    pub records: u64,

    /// Text lines dropped under `TextErrorPolicy::Skip`
    pub skipped: u64,

    /// Distinct series seen (text input only)
    pub series: Option<usize>,

    /// Dictionary size from the header (binary input only)
    pub dictionary_len: Option<usize>,

    /// Wall time of the pass
    pub elapsed: Duration,
}

impl LoadStats {
    fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            records: 0,
            skipped: 0,
            series: None,
            dictionary_len: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Average throughput over the pass
    pub fn points_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Loads record files according to a `Config`
pub struct Loader {
    config: Config,
}

impl Loader {
    const TEXT_EXTENSION: &'static str = "tsd";

    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Encoding implied by a file name
    pub fn encoding_for(path: &Path) -> Encoding {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(Self::TEXT_EXTENSION) => Encoding::PlainText,
            _ => Encoding::Dictionary,
        }
    }

    /// Load a file, choosing the decoder by extension
    ///
    /// The file handle is owned by the decoder and closed on every exit path.
    pub fn load_path(&self, path: &Path) -> Result<LoadStats> {
        let start = Instant::now();
        let encoding = Self::encoding_for(path);

        tracing::debug!("Loading {} as {:?}", path.display(), encoding);

        let mut stats = match (encoding, self.config.read_strategy) {
            (Encoding::PlainText, _) => {
                let file = File::open(path)?;
                self.load_text(BufReader::with_capacity(self.config.text_read_buffer, file))?
            }
            (Encoding::Dictionary, ReadStrategy::Streaming) => {
                self.load_stream(File::open(path)?)?
            }
            (Encoding::Dictionary, ReadStrategy::InMemory) => {
                let bytes = fs::read(path)?;
                self.load_bytes(&bytes)?
            }
        };
        stats.elapsed = start.elapsed();

        tracing::info!(
            "Loaded {} records from {} in {:.3}s ({} skipped)",
            stats.records,
            path.display(),
            stats.elapsed.as_secs_f64(),
            stats.skipped
        );

        Ok(stats)
    }

    /// Drain a binary stream through the streaming reader
    pub fn load_stream<R: Read>(&self, source: R) -> Result<LoadStats> {
        let start = Instant::now();
        let mut reader = StreamReader::open(source, &self.config)?;
        let mut stats = LoadStats::new(Encoding::Dictionary);
        stats.dictionary_len = Some(reader.dictionary().len());

        while reader.next_point()?.is_some() {
            stats.records += 1;
        }

        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    /// Drain a binary stream already held in memory
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<LoadStats> {
        let start = Instant::now();
        let mut scanner = FrameScanner::open(bytes)?;
        let mut stats = LoadStats::new(Encoding::Dictionary);
        stats.dictionary_len = Some(scanner.dictionary().len());

        while scanner.next_point()?.is_some() {
            stats.records += 1;
        }

        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    /// Parse every line of a text stream
    pub fn load_text<B: BufRead>(&self, mut input: B) -> Result<LoadStats> {
        let start = Instant::now();
        let mut parser = LineParser::new();
        let mut stats = LoadStats::new(Encoding::PlainText);
        let mut line = String::with_capacity(256);

        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let record = line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(&line);

            match parser.parse_line(record) {
                Ok(_) => stats.records += 1,
                Err(e) if e.is_line_error() && self.config.text_error_policy == TextErrorPolicy::Skip => {
                    tracing::warn!("Skipping line {}: {}", parser.line_number(), e);
                    stats.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        stats.series = Some(parser.series_count());
        stats.elapsed = start.elapsed();
        Ok(stats)
    }
}
