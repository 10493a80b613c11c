//! Codec Module
//!
//! Binary encoding of the header dictionary and of individual points.
//!
//! ## Stream Format
//! ```text
//! ┌──────────┬──────────────────────────────────────┐
//! │ Len (2)  │ Header: bincode Vec<String>          │
//! ├──────────┼──────────────────────────────────────┤
//! │ Len (2)  │ Record: bincode WireRecord           │
//! ├──────────┼──────────────────────────────────────┤
//! │   ...    │ ... repeated until end of stream     │
//! └──────────┴──────────────────────────────────────┘
//! ```
//!
//! Lengths are unsigned 16-bit big-endian, so no payload exceeds 65535 bytes.
//!
//! ### Record Payload
//! ```text
//! metric_id: u32 | timestamp: i64 | kind: Integer/Float | bits: i32 | tags: [(key_id, value_id)]
//! ```
//! Float values travel as their raw IEEE-754 bits; `kind` says how to read
//! `bits`.
//!
//! Payloads are fixed-width little-endian bincode. A payload must be consumed
//! exactly: trailing bytes inside a frame are a decode error.

mod frame;
mod header;
mod record;

pub use frame::{encode_frame, split_frame, write_frame, FrameSplit, FRAME_PREFIX_SIZE, MAX_FRAME_PAYLOAD};
pub use header::{decode_header, decode_header_payload, encode_header, write_header};
pub use record::{decode_frame, decode_record, encode_point, encode_record};

/// bincode settings shared by every payload
fn wire_options() -> impl bincode::Options {
    use bincode::Options;

    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}
