//! Stream Module
//!
//! Reading and writing whole record streams.
//!
//! ## Readers
//! Two readers decode the same binary stream with identical per-record
//! semantics:
//! - [`StreamReader`]: pulls from any `Read` through a compacting buffer,
//!   so frames may straddle read boundaries
//! - [`FrameScanner`]: walks an in-memory byte slice with a cursor
//!
//! ## Buffer Layout (StreamReader)
//! ```text
//! ┌──────────────┬─────────────────────────┬──────────────┐
//! │  consumed    │   unread [pos, limit)   │   free       │
//! └──────────────┴─────────────────────────┴──────────────┘
//!                 ▲ compact slides this to 0 before a refill
//! ```
//!
//! ## Writer
//! [`RecordWriter`] emits either encoding: a header followed by binary
//! frames, or plain text lines.

mod reader;
mod scan;
mod writer;

pub use reader::StreamReader;
pub use scan::FrameScanner;
pub use writer::RecordWriter;
