//! Dictionary Module
//!
//! String interning for metric names, tag keys and tag values.
//!
//! ## Responsibilities
//! - Map each distinct string to a small, stable integer id
//! - Resolve ids back to strings when decoding
//! - Provide the ordered string list written as the stream header
//!
//! ## Id Assignment
//! Ids are dense and zero-based, handed out in first-seen order:
//! ```text
//! intern("cpu")   -> 0
//! intern("host")  -> 1
//! intern("web01") -> 2
//! intern("cpu")   -> 0   (already present)
//! ```
//!
//! A dictionary belongs to exactly one stream session. The writer builds it
//! before encoding any record; the reader rebuilds it from the header.

mod table;

pub use table::Dictionary;
