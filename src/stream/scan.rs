//! In-memory frame scanner
//!
//! Decodes a whole binary stream already held in memory, walking frames with
//! an explicit cursor. Errors and ordering match `StreamReader`.

use crate::codec::{decode_header, decode_record, split_frame, FrameSplit};
use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};
use crate::point::EncodedPoint;

/// Cursor-based reader over a complete binary stream
pub struct FrameScanner<'a> {
    bytes: &'a [u8],
    cursor: usize,
    dictionary: Dictionary,
    records: u64,
    failed: bool,
}

impl<'a> FrameScanner<'a> {
    /// Decode the header and position the cursor on the first record
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let (dictionary, consumed) = decode_header(bytes)?;
        tracing::debug!(
            "Scanning {} byte stream: header {} bytes, {} dictionary entries",
            bytes.len(),
            consumed,
            dictionary.len()
        );

        Ok(Self {
            bytes,
            cursor: consumed,
            dictionary,
            records: 0,
            failed: false,
        })
    }

    /// Read the next record, or `Ok(None)` at the end of the slice
    pub fn next_point(&mut self) -> Result<Option<EncodedPoint>> {
        if self.cursor == self.bytes.len() {
            return Ok(None);
        }

        match split_frame(&self.bytes[self.cursor..]) {
            FrameSplit::Complete { payload, consumed } => {
                let point = decode_record(payload).map_err(|e| TsbError::CorruptRecord {
                    records: self.records,
                    offset: self.cursor as u64,
                    reason: e.to_string(),
                })?;
                self.cursor += consumed;
                self.records += 1;
                Ok(Some(point))
            }
            FrameSplit::Incomplete {
                expected,
                available,
            } => Err(TsbError::TruncatedRecord {
                records: self.records,
                offset: self.cursor as u64,
                expected,
                available,
            }),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Number of complete records returned so far
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Bytes consumed by complete frames (header included)
    pub fn bytes_consumed(&self) -> u64 {
        self.cursor as u64
    }
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = Result<EncodedPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_point() {
            Ok(Some(point)) => Some(Ok(point)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
