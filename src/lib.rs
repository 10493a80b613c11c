//! # tsbench
//!
//! Benchmarks two encodings of the same time-series record:
//! - a self-describing text line per point
//! - a dictionary-encoded binary stream (header dictionary + framed records)
//!
//! ## Architecture Overview
//!
//! ```text
//!            Generator                          Loader
//!                │                                │
//!                ▼                     ┌──────────┴──────────┐
//!          RecordWriter                │                     │
//!        ┌───────┴───────┐             ▼                     ▼
//!        │               │       StreamReader /          LineParser
//!        ▼               ▼       FrameScanner                │
//!   codec (header,   text format       │                     ▼
//!   record, frame)                     ▼                split_on /
//!        │                       codec (decode)       parse_signed_integer
//!        ▼                             │
//!    Dictionary  ◄─────────────────────┘
//! ```
//!
//! ## Binary Stream
//! ```text
//! [u16 headerLen][header][u16 frameLen][record][u16 frameLen][record]...
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod dictionary;
pub mod point;
pub mod codec;
pub mod stream;
pub mod text;
pub mod loader;
pub mod generator;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TsbError, Result};
pub use config::{Config, Encoding, ReadStrategy, TextErrorPolicy};
pub use dictionary::Dictionary;
pub use point::{DataPoint, EncodedPoint, Tag, TagPair, TimeValue, Value, ValueKind};
pub use stream::{FrameScanner, RecordWriter, StreamReader};
pub use text::LineParser;
pub use loader::{LoadStats, Loader};
pub use generator::{Generator, GeneratorConfig};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tsbench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
