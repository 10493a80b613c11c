//! Configuration for tsbench
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, TsbError};

/// Main configuration for a write or load session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Encoding Configuration
    // -------------------------------------------------------------------------
    /// Which on-disk encoding the writer produces
    pub encoding: Encoding,

    // -------------------------------------------------------------------------
    // Binary Reader Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of the streaming reader's buffer (in bytes)
    pub buffer_capacity: usize,

    /// Refill the buffer once fewer than this many unread bytes remain
    pub low_water_mark: usize,

    /// Stream the binary file or load it into memory first
    pub read_strategy: ReadStrategy,

    // -------------------------------------------------------------------------
    // Text Reader Configuration
    // -------------------------------------------------------------------------
    /// What to do with a line that fails validation
    pub text_error_policy: TextErrorPolicy,

    /// Capacity of the buffered line reader (in bytes)
    pub text_read_buffer: usize,
}

/// Record encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Header dictionary followed by length-prefixed binary frames
    Dictionary,

    /// One space-separated text line per record
    PlainText,
}

impl Encoding {
    /// File extension used for this encoding (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Dictionary => "pb",
            Encoding::PlainText => "tsd",
        }
    }
}

/// Binary read strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Incremental reads through a compacting buffer
    Streaming,

    /// Read the whole file, then scan it with a cursor
    InMemory,
}

/// Policy for text lines that fail to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextErrorPolicy {
    /// Abort the load on the first bad line
    Fail,

    /// Log the line, count it as skipped and continue
    Skip,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: Encoding::Dictionary,
            buffer_capacity: 100_000,
            low_water_mark: 10_000,
            read_strategy: ReadStrategy::Streaming,
            text_error_policy: TextErrorPolicy::Fail,
            text_read_buffer: 102_400,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the buffer parameters are usable
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(TsbError::Config("buffer_capacity must be positive".to_string()));
        }
        if self.low_water_mark > self.buffer_capacity {
            return Err(TsbError::Config(format!(
                "low_water_mark ({}) exceeds buffer_capacity ({})",
                self.low_water_mark, self.buffer_capacity
            )));
        }
        if self.text_read_buffer == 0 {
            return Err(TsbError::Config("text_read_buffer must be positive".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the output encoding
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Set the streaming reader buffer capacity (in bytes)
    pub fn buffer_capacity(mut self, size: usize) -> Self {
        self.config.buffer_capacity = size;
        self
    }

    /// Set the refill threshold (in bytes)
    pub fn low_water_mark(mut self, size: usize) -> Self {
        self.config.low_water_mark = size;
        self
    }

    /// Set the binary read strategy
    pub fn read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.config.read_strategy = strategy;
        self
    }

    /// Set the policy for malformed text lines
    pub fn text_error_policy(mut self, policy: TextErrorPolicy) -> Self {
        self.config.text_error_policy = policy;
        self
    }

    /// Set the line reader capacity (in bytes)
    pub fn text_read_buffer(mut self, size: usize) -> Self {
        self.config.text_read_buffer = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
