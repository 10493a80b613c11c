//! Record writer
//!
//! One writer for both encodings, selected by `Encoding`.

use std::io::Write;

use crate::codec::{encode_record, write_header};
use crate::config::{Config, Encoding};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::point::DataPoint;
use crate::text::format_line;

/// Writes points to a sink in the configured encoding
///
/// The sink is written as-is; wrap files in a `BufWriter`.
pub struct RecordWriter<W: Write> {
    sink: W,
    encoding: Encoding,

    /// Names → ids for binary frames (unused for plain text)
    dictionary: Dictionary,

    /// Reused line buffer for plain text
    line: String,

    records: u64,
    bytes: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer for the given encoding
    ///
    /// For `Encoding::Dictionary` the header block is written immediately,
    /// so the dictionary must already hold every name the points will use.
    pub fn new(mut sink: W, encoding: Encoding, dictionary: Dictionary) -> Result<Self> {
        let bytes = match encoding {
            Encoding::Dictionary => write_header(&mut sink, &dictionary)? as u64,
            Encoding::PlainText => 0,
        };

        tracing::debug!(
            "Record writer opened: {:?}, {} dictionary entries",
            encoding,
            dictionary.len()
        );

        Ok(Self {
            sink,
            encoding,
            dictionary,
            line: String::with_capacity(128),
            records: 0,
            bytes,
        })
    }

    /// Binary writer: header, then one frame per point
    pub fn dictionary(sink: W, dictionary: Dictionary) -> Result<Self> {
        Self::new(sink, Encoding::Dictionary, dictionary)
    }

    /// Writer for the encoding selected in `config`
    pub fn from_config(sink: W, config: &Config, dictionary: Dictionary) -> Result<Self> {
        Self::new(sink, config.encoding, dictionary)
    }

    /// Text writer: one line per point
    pub fn plain_text(sink: W) -> Result<Self> {
        Self::new(sink, Encoding::PlainText, Dictionary::new())
    }

    /// Append one point
    pub fn write(&mut self, point: &DataPoint) -> Result<()> {
        match self.encoding {
            Encoding::Dictionary => {
                let frame = encode_record(point, &self.dictionary)?;
                self.sink.write_all(&frame)?;
                self.bytes += frame.len() as u64;
            }
            Encoding::PlainText => {
                self.line.clear();
                format_line(point, &mut self.line)?;
                self.sink.write_all(self.line.as_bytes())?;
                self.bytes += self.line.len() as u64;
            }
        }

        self.records += 1;
        Ok(())
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Bytes handed to the sink, header included
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flush and return the sink
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        tracing::debug!(
            "Record writer finished: {} records, {} bytes",
            self.records,
            self.bytes
        );
        Ok(self.sink)
    }
}
