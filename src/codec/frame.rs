//! Frame helpers
//!
//! A frame is a 2-byte big-endian length followed by exactly that many bytes.

use std::io::Write;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, TsbError};

/// Size of the length prefix
pub const FRAME_PREFIX_SIZE: usize = 2;

/// Largest payload a frame can carry
pub const MAX_FRAME_PAYLOAD: usize = u16::MAX as usize;

/// Outcome of splitting one frame off the front of a byte slice
#[derive(Debug, PartialEq, Eq)]
pub enum FrameSplit<'a> {
    /// A whole frame was present
    Complete {
        payload: &'a [u8],
        /// Prefix + payload bytes
        consumed: usize,
    },

    /// Not enough bytes for the prefix or the declared payload
    Incomplete {
        /// Bytes needed for the whole frame (prefix only, if it is itself cut)
        expected: usize,
        available: usize,
    },
}

/// Prefix a payload with its length
pub fn encode_frame(payload: &[u8]) -> Result<Bytes> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(TsbError::FrameTooLarge {
            size: payload.len(),
        });
    }

    let mut frame = BytesMut::with_capacity(FRAME_PREFIX_SIZE + payload.len());
    frame.put_u16(payload.len() as u16);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Write a framed payload, returning the bytes written
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<usize> {
    let frame = encode_frame(payload)?;
    writer.write_all(&frame)?;
    Ok(frame.len())
}

/// Split the first frame off `bytes`
pub fn split_frame(bytes: &[u8]) -> FrameSplit<'_> {
    if bytes.len() < FRAME_PREFIX_SIZE {
        return FrameSplit::Incomplete {
            expected: FRAME_PREFIX_SIZE,
            available: bytes.len(),
        };
    }

    let mut prefix = &bytes[..FRAME_PREFIX_SIZE];
    let total = FRAME_PREFIX_SIZE + prefix.get_u16() as usize;
    if bytes.len() < total {
        return FrameSplit::Incomplete {
            expected: total,
            available: bytes.len(),
        };
    }

    FrameSplit::Complete {
        payload: &bytes[FRAME_PREFIX_SIZE..total],
        consumed: total,
    }
}
