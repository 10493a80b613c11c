//! Streaming buffered reader
//!
//! Decodes framed records from a byte source without holding the whole
//! stream in memory and without assuming frames align with reads.

use std::io::Read;
use std::ops::Range;

use crate::codec::{decode_header_payload, decode_record, FRAME_PREFIX_SIZE, MAX_FRAME_PAYLOAD};
use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};
use crate::point::EncodedPoint;

/// Result of pulling one frame out of the buffer
enum NextFrame {
    /// Payload location inside `buf`
    Frame(Range<usize>),

    /// Source exhausted on a frame boundary
    End,

    /// Source exhausted inside a frame
    Short { expected: usize, available: usize },
}

/// Reads a header and then records from a byte source
///
/// The reader owns the source; dropping the reader (including while an
/// error propagates) closes it. Use `into_inner` to take it back.
pub struct StreamReader<R: Read> {
    source: R,

    /// Working buffer; unread bytes live in `[position, limit)`
    buf: Vec<u8>,
    position: usize,
    limit: usize,

    /// Refill threshold
    low_water_mark: usize,

    /// Source returned end of file
    exhausted: bool,

    /// Dictionary decoded from the header
    dictionary: Dictionary,

    /// Stream bytes consumed by complete frames (header included)
    offset: u64,

    /// Complete records returned so far
    records: u64,

    /// Set once the iterator has yielded an error
    failed: bool,
}

impl<R: Read> StreamReader<R> {
    /// Open a reader and decode the header block
    pub fn open(source: R, config: &Config) -> Result<Self> {
        config.validate()?;

        let mut reader = Self {
            source,
            buf: vec![0u8; config.buffer_capacity],
            position: 0,
            limit: 0,
            low_water_mark: config.low_water_mark,
            exhausted: false,
            dictionary: Dictionary::new(),
            offset: 0,
            records: 0,
            failed: false,
        };

        let payload = match reader.next_frame()? {
            NextFrame::Frame(range) => range,
            NextFrame::End => {
                return Err(TsbError::TruncatedHeader {
                    expected: FRAME_PREFIX_SIZE,
                    available: 0,
                })
            }
            NextFrame::Short {
                expected,
                available,
            } => {
                return Err(TsbError::TruncatedHeader {
                    expected,
                    available,
                })
            }
        };

        reader.dictionary = decode_header_payload(&reader.buf[payload])?;
        tracing::debug!(
            "Opened record stream: header {} bytes, {} dictionary entries",
            reader.offset,
            reader.dictionary.len()
        );

        Ok(reader)
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` once the source is exhausted on a frame boundary.
    /// A payload that fails to decode is a `CorruptRecord` located at the
    /// start of its frame.
    pub fn next_point(&mut self) -> Result<Option<EncodedPoint>> {
        let frame_start = self.offset;
        match self.next_frame()? {
            NextFrame::Frame(range) => {
                let point = decode_record(&self.buf[range]).map_err(|e| TsbError::CorruptRecord {
                    records: self.records,
                    offset: frame_start,
                    reason: e.to_string(),
                })?;
                self.records += 1;
                Ok(Some(point))
            }
            NextFrame::End => Ok(None),
            NextFrame::Short {
                expected,
                available,
            } => Err(TsbError::TruncatedRecord {
                records: self.records,
                offset: self.offset,
                expected,
                available,
            }),
        }
    }

    /// Dictionary decoded from the header
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Number of complete records returned so far
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Stream bytes consumed by complete frames
    pub fn bytes_consumed(&self) -> u64 {
        self.offset
    }

    /// Give back the underlying source
    pub fn into_inner(self) -> R {
        self.source
    }

    // =========================================================================
    // Buffer Management
    // =========================================================================

    fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Refill once if the unread window has dropped below the low-water mark
    fn fill_buffer(&mut self) -> Result<()> {
        if self.remaining() < self.low_water_mark && !self.exhausted {
            self.compact();
            self.read_source()?;
        }
        Ok(())
    }

    /// Keep reading until `needed` unread bytes are buffered
    ///
    /// Returns false if the source ran out first.
    fn ensure(&mut self, needed: usize) -> Result<bool> {
        while self.remaining() < needed {
            if self.exhausted {
                return Ok(false);
            }
            if needed > self.buf.len() {
                self.buf.resize(needed, 0);
            }
            self.compact();
            self.read_source()?;
        }
        Ok(true)
    }

    /// Slide unread bytes to the front of the buffer
    fn compact(&mut self) {
        if self.position > 0 {
            self.buf.copy_within(self.position..self.limit, 0);
            self.limit -= self.position;
            self.position = 0;
        }
    }

    /// Issue one read into the free tail of the buffer
    fn read_source(&mut self) -> Result<usize> {
        debug_assert!(self.limit < self.buf.len());

        let n = self.source.read(&mut self.buf[self.limit..])?;
        if n == 0 {
            self.exhausted = true;
        } else {
            self.limit += n;
        }

        tracing::trace!(
            "Buffer refill: read {} bytes, {} unread, exhausted={}",
            n,
            self.remaining(),
            self.exhausted
        );
        Ok(n)
    }

    /// Locate the next complete frame, consuming it from the buffer
    fn next_frame(&mut self) -> Result<NextFrame> {
        self.fill_buffer()?;

        if !self.ensure(1)? {
            return Ok(NextFrame::End);
        }

        if !self.ensure(FRAME_PREFIX_SIZE)? {
            return Ok(NextFrame::Short {
                expected: FRAME_PREFIX_SIZE,
                available: self.remaining(),
            });
        }

        let len = u16::from_be_bytes([self.buf[self.position], self.buf[self.position + 1]]) as usize;
        debug_assert!(len <= MAX_FRAME_PAYLOAD);
        let total = FRAME_PREFIX_SIZE + len;

        if !self.ensure(total)? {
            return Ok(NextFrame::Short {
                expected: total,
                available: self.remaining(),
            });
        }

        let start = self.position + FRAME_PREFIX_SIZE;
        self.position += total;
        self.offset += total as u64;

        Ok(NextFrame::Frame(start..start + len))
    }
}

impl<R: Read> Iterator for StreamReader<R> {
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
