//! Data point definitions
//!
//! The logical time-series record in its resolved (names) and encoded (ids)
//! forms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};

/// Type of a point's value, carried explicitly on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValueKind {
    Integer = 0,
    Float = 1,
}

/// A point's value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i32),
    Float(f32),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
        }
    }

    /// 32-bit payload: the integer itself, or the raw IEEE-754 bits of the float
    pub fn to_bits(&self) -> i32 {
        match self {
            Value::Integer(v) => *v,
            Value::Float(f) => f.to_bits() as i32,
        }
    }

    /// Rebuild a value from its kind and 32-bit payload
    pub fn from_bits(kind: ValueKind, bits: i32) -> Self {
        match kind {
            ValueKind::Integer => Value::Integer(bits),
            ValueKind::Float => Value::Float(f32::from_bits(bits as u32)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            // Debug keeps a '.' or exponent so the text re-parses as a float
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A tag with resolved key and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A resolved data point
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Metric name (non-empty)
    pub metric: String,

    /// Timestamp in seconds or milliseconds, strictly positive
    pub timestamp: i64,

    pub value: Value,

    /// Tags in write order; a key may repeat only with the same value
    pub tags: Vec<Tag>,
}

impl DataPoint {
    pub fn new(metric: impl Into<String>, timestamp: i64, value: Value) -> Self {
        Self {
            metric: metric.into(),
            timestamp,
            value,
            tags: Vec::new(),
        }
    }

    /// Append a tag (builder style)
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    /// Check the record invariants before encoding
    pub fn validate(&self) -> Result<()> {
        if self.metric.is_empty() {
            return Err(TsbError::InvalidRecord("empty metric name".to_string()));
        }
        if self.timestamp <= 0 {
            return Err(TsbError::InvalidRecord(format!(
                "non-positive timestamp {} for metric {}",
                self.timestamp, self.metric
            )));
        }
        for (i, tag) in self.tags.iter().enumerate() {
            if let Some(existing) = self.tags[..i]
                .iter()
                .find(|t| t.key == tag.key && t.value != tag.value)
            {
                return Err(TsbError::InvalidRecord(format!(
                    "tag {}={} conflicts with {}={} for metric {}",
                    tag.key, tag.value, existing.key, existing.value, self.metric
                )));
            }
        }
        Ok(())
    }

    /// Tags with repeated identical pairs dropped, first occurrence kept
    pub fn distinct_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(i, tag)| !self.tags[..*i].iter().any(|t| t.key == tag.key))
            .map(|(_, tag)| tag)
    }
}

/// A tag as dictionary ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPair {
    pub key_id: u32,
    pub value_id: u32,
}

/// A decoded binary point with ids left unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPoint {
    pub metric_id: u32,
    pub timestamp: i64,
    pub value: Value,
    pub tags: Vec<TagPair>,
}

impl EncodedPoint {
    /// Resolve ids back to names through the stream's dictionary
    pub fn resolve(&self, dictionary: &Dictionary) -> Result<DataPoint> {
        let tags = self
            .tags
            .iter()
            .map(|pair| {
                Ok(Tag::new(
                    dictionary.string_at(pair.key_id)?,
                    dictionary.string_at(pair.value_id)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DataPoint {
            metric: dictionary.string_at(self.metric_id)?.to_string(),
            timestamp: self.timestamp,
            value: self.value,
            tags,
        })
    }
}

/// A parsed text line: series index plus sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    /// Index of the (metric, tags) series in first-seen order
    pub series: u32,
    pub timestamp: i64,
    pub value: Value,
}
