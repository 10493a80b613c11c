//! Header block codec
//!
//! The header is the dictionary's ordered string list in a single frame.

use std::io::Write;

use bincode::Options;
use bytes::Bytes;

use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};

use super::frame::{encode_frame, split_frame, FrameSplit};
use super::wire_options;

/// Encode the dictionary as a framed header block
pub fn encode_header(dictionary: &Dictionary) -> Result<Bytes> {
    let payload = wire_options().serialize(dictionary.strings())?;
    encode_frame(&payload)
}

/// Write the header block, returning the bytes written
pub fn write_header<W: Write>(writer: &mut W, dictionary: &Dictionary) -> Result<usize> {
    let frame = encode_header(dictionary)?;
    writer.write_all(&frame)?;
    Ok(frame.len())
}

/// Decode a header block from the start of `bytes`
///
/// Returns the rebuilt dictionary and the number of bytes consumed.
pub fn decode_header(bytes: &[u8]) -> Result<(Dictionary, usize)> {
    match split_frame(bytes) {
        FrameSplit::Complete { payload, consumed } => {
            Ok((decode_header_payload(payload)?, consumed))
        }
        FrameSplit::Incomplete {
            expected,
            available,
        } => Err(TsbError::TruncatedHeader {
            expected,
            available,
        }),
    }
}

/// Decode a header payload (frame prefix already removed)
pub fn decode_header_payload(payload: &[u8]) -> Result<Dictionary> {
    let strings: Vec<String> = wire_options().deserialize(payload)?;
    Ok(Dictionary::from_strings(strings))
}
