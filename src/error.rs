//! Error types for tsbench
//!
//! Provides a unified error type for the codec, the readers and the text parser.

use thiserror::Error;

/// Result type alias using TsbError
pub type Result<T> = std::result::Result<T, TsbError>;

/// Unified error type for tsbench operations
#[derive(Debug, Error)]
pub enum TsbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Frame too large: {size} bytes (max {max})", max = u16::MAX)]
    FrameTooLarge { size: usize },

    #[error("Truncated header: expected {expected} bytes, {available} available")]
    TruncatedHeader { expected: usize, available: usize },

    #[error(
        "Truncated record at byte offset {offset} after {records} complete records: \
         expected {expected} bytes, {available} available"
    )]
    TruncatedRecord {
        records: u64,
        offset: u64,
        expected: usize,
        available: usize,
    },

    #[error("Corrupt record at byte offset {offset} after {records} complete records: {reason}")]
    CorruptRecord {
        records: u64,
        offset: u64,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Dictionary Errors
    // -------------------------------------------------------------------------
    #[error("String not in dictionary: {0:?}")]
    UnknownString(String),

    #[error("Dictionary id {id} out of range (len {len})")]
    IdOutOfRange { id: u32, len: usize },

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // -------------------------------------------------------------------------
    // Text Parsing Errors
    // -------------------------------------------------------------------------
    #[error("Malformed line {line}: invalid {field}: {reason}")]
    MalformedLine {
        line: u64,
        field: &'static str,
        reason: String,
    },

    #[error("Duplicate tag on line {line}: {key}={conflicting} conflicts with {key}={existing}")]
    DuplicateTag {
        line: u64,
        key: String,
        existing: String,
        conflicting: String,
    },

    #[error("Number format error in {input:?}: {reason}")]
    NumberFormat { input: String, reason: &'static str },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for TsbError {
    fn from(err: bincode::Error) -> Self {
        TsbError::Serialization(err.to_string())
    }
}

impl TsbError {
    /// Whether this error came from parsing a text line (as opposed to I/O or framing)
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            TsbError::MalformedLine { .. }
                | TsbError::DuplicateTag { .. }
                | TsbError::NumberFormat { .. }
        )
    }
}
