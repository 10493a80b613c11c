//! Generator Module
//!
//! Synthesizes points at a fixed cadence with a random-walk value.
//!
//! ## Shape of the Data
//! - timestamps from 2010-01-01T00:00:00Z, `points_per_hour` per hour,
//!   in seconds (or milliseconds once the cadence is finer than 1s)
//! - metric `name`, or `name.N` when several metrics are requested
//! - tags `tag0=value3 tag1=value0 ...`, values drawn uniformly
//! - value starts in [-50, 50] and moves by up to ±50 per point

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Encoding;
use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};
use crate::point::{DataPoint, Tag, Value};
use crate::stream::RecordWriter;

/// First timestamp, 2010-01-01T00:00:00Z in seconds
pub const START_TIMESTAMP_SECS: i64 = 1_262_304_000;

/// Width of the uniform step range
const VALUE_RANGE: i32 = 101;

/// Offset that centers the step range on zero
const VALUE_GAP: i32 = 50;

/// Parameters for a generation run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Base metric name
    pub metric: String,

    pub days: u32,

    pub points_per_hour: u32,

    /// Number of distinct metric names
    pub metrics: u32,

    /// Tag keys per point
    pub tag_keys: u32,

    /// Distinct values per tag key
    pub tag_values: u32,

    /// Fixed RNG seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            metric: "metric".to_string(),
            days: 1,
            points_per_hour: 3600,
            metrics: 1,
            tag_keys: 1,
            tag_values: 1,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.metric.is_empty() || self.metric.contains(&[' ', '='][..]) {
            return Err(TsbError::Config(format!(
                "metric name {:?} must be non-empty without spaces or '='",
                self.metric
            )));
        }
        for (name, value) in [
            ("days", self.days),
            ("points_per_hour", self.points_per_hour),
            ("metrics", self.metrics),
            ("tag_keys", self.tag_keys),
            ("tag_values", self.tag_values),
        ] {
            if value == 0 {
                return Err(TsbError::Config(format!("{name} must be a positive integer")));
            }
        }
        Ok(())
    }

    /// Total points a run will produce
    pub fn total_points(&self) -> u64 {
        u64::from(self.days) * 24 * u64::from(self.points_per_hour)
    }

    /// First timestamp and step between points
    ///
    /// Milliseconds when more than one point per second is requested.
    pub fn timestamps(&self) -> (i64, i64) {
        let pph = i64::from(self.points_per_hour);
        if pph > 3600 {
            (START_TIMESTAMP_SECS * 1000, 3_600_000 / pph)
        } else {
            (START_TIMESTAMP_SECS, 3600 / pph)
        }
    }
}

/// Summary of a generation run
#[derive(Debug, Clone)]
pub struct GenerateStats {
    /// File written, if any
    pub path: Option<PathBuf>,
    pub records: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Synthetic point generator
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Every metric name the run can produce
    pub fn metric_names(&self) -> Vec<String> {
        if self.config.metrics > 1 {
            (0..self.config.metrics)
                .map(|i| format!("{}.{}", self.config.metric, i))
                .collect()
        } else {
            vec![self.config.metric.clone()]
        }
    }

    /// Dictionary holding every name the run can produce
    ///
    /// Order: metric names, then each tag key followed by its values.
    pub fn dictionary(&self) -> Dictionary {
        let mut dictionary = Dictionary::new();
        for name in self.metric_names() {
            dictionary.intern(&name);
        }
        for k in 0..self.config.tag_keys {
            dictionary.intern(&format!("tag{k}"));
            for v in 0..self.config.tag_values {
                dictionary.intern(&format!("value{v}"));
            }
        }
        dictionary
    }

    /// Write the full run to `writer`, returning the number of points
    pub fn generate_to<W: Write>(&mut self, writer: &mut RecordWriter<W>) -> Result<u64> {
        let metric_names = self.metric_names();
        let (mut time, step) = self.config.timestamps();
        let mut value = self.rng.gen_range(0..VALUE_RANGE) - VALUE_GAP;
        let mut count = 0u64;

        for _day in 0..self.config.days {
            for _hour in 0..24 {
                for _ in 0..self.config.points_per_hour {
                    let metric = if metric_names.len() > 1 {
                        &metric_names[self.rng.gen_range(0..metric_names.len())]
                    } else {
                        &metric_names[0]
                    };

                    let tags = (0..self.config.tag_keys)
                        .map(|k| {
                            let v = self.rng.gen_range(0..self.config.tag_values);
                            Tag::new(format!("tag{k}"), format!("value{v}"))
                        })
                        .collect();

                    writer.write(&DataPoint {
                        metric: metric.clone(),
                        timestamp: time,
                        value: Value::Integer(value),
                        tags,
                    })?;

                    value = value.saturating_add(self.rng.gen_range(0..VALUE_RANGE) - VALUE_GAP);
                    time += step;
                    count += 1;
                }
            }
        }

        Ok(count)
    }

    /// Write the run to `<dir>/<metric>.<ext>` in the given encoding
    pub fn generate_file(&mut self, dir: &Path, encoding: Encoding) -> Result<GenerateStats> {
        let start = Instant::now();
        let path = dir.join(format!("{}.{}", self.config.metric, encoding.extension()));

        let file = File::create(&path)?;
        let mut writer = RecordWriter::new(BufWriter::new(file), encoding, self.dictionary())?;
        let records = self.generate_to(&mut writer)?;
        let bytes = writer.bytes_written();
        writer.finish()?;

        let stats = GenerateStats {
            path: Some(path),
            records,
            bytes,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Generated {} points ({} bytes) in {:.3}s",
            stats.records,
            stats.bytes,
            stats.elapsed.as_secs_f64()
        );

        Ok(stats)
    }
}
