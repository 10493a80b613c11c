//! Text line parser
//!
//! Validates `metric timestamp value [key=value]*` lines and groups them into
//! series.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TsbError};
use crate::point::{TimeValue, Value};

use super::fast::{looks_like_integer, parse_signed_integer, split_on};

/// A series identity: metric name plus its full tag map
///
/// Tags are held sorted, so token order on the line does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub metric: String,
    pub tags: BTreeMap<String, String>,
}

/// Series seen so far, indexed in first-seen order
///
/// Grows monotonically for the lifetime of a load.
#[derive(Debug, Default)]
pub struct SeriesRegistry {
    index: HashMap<SeriesKey, u32>,
    keys: Vec<SeriesKey>,
}

impl SeriesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, registering it with the next index if new
    pub fn get_or_insert(&mut self, key: SeriesKey) -> u32 {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }

        let idx = self.keys.len() as u32;
        self.index.insert(key.clone(), idx);
        self.keys.push(key);
        idx
    }

    pub fn get(&self, idx: u32) -> Option<&SeriesKey> {
        self.keys.get(idx as usize)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Series in index order
    pub fn iter(&self) -> impl Iterator<Item = &SeriesKey> {
        self.keys.iter()
    }
}

/// Stateful parser for one text stream
///
/// Counts lines (1-based) for error context and owns the series registry.
#[derive(Debug, Default)]
pub struct LineParser {
    registry: SeriesRegistry,
    line: u64,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line (without its newline)
    ///
    /// Every line counts toward the line number, including rejected ones.
    pub fn parse_line(&mut self, line: &str) -> Result<TimeValue> {
        self.line += 1;
        let line_no = self.line;
        let words = split_on(line, b' ');

        let metric = words[0];
        if metric.is_empty() {
            return Err(malformed(line_no, "metric", "empty metric name".to_string()));
        }

        let timestamp = match words.get(1) {
            Some(field) => parse_signed_integer(field)
                .map_err(|e| malformed(line_no, "timestamp", e.to_string()))?,
            None => return Err(malformed(line_no, "timestamp", "missing field".to_string())),
        };
        if timestamp <= 0 {
            return Err(malformed(
                line_no,
                "timestamp",
                format!("{timestamp} is not positive"),
            ));
        }

        let value = match words.get(2) {
            Some(field) if !field.is_empty() => *field,
            _ => return Err(malformed(line_no, "value", "empty value".to_string())),
        };

        let mut tags = BTreeMap::new();
        for token in &words[3..] {
            parse_tag(&mut tags, token, line_no)?;
        }

        let value = parse_value(value).map_err(|e| malformed(line_no, "value", e.to_string()))?;

        let series = self.registry.get_or_insert(SeriesKey {
            metric: metric.to_string(),
            tags,
        });

        Ok(TimeValue {
            series,
            timestamp,
            value,
        })
    }

    /// Lines handed to `parse_line` so far
    pub fn line_number(&self) -> u64 {
        self.line
    }

    pub fn series_count(&self) -> usize {
        self.registry.len()
    }

    /// Series registered under `idx`
    pub fn series(&self, idx: u32) -> Option<&SeriesKey> {
        self.registry.get(idx)
    }

    pub fn registry(&self) -> &SeriesRegistry {
        &self.registry
    }
}

/// Add one `key=value` token to `tags`
///
/// A key repeated with the same value is accepted; with a different value it
/// is a `DuplicateTag`.
fn parse_tag(tags: &mut BTreeMap<String, String>, token: &str, line: u64) -> Result<()> {
    let kv = split_on(token, b'=');
    if kv.len() != 2 || kv[0].is_empty() || kv[1].is_empty() {
        return Err(malformed(line, "tag", format!("{token:?} is not key=value")));
    }

    match tags.get(kv[0]) {
        Some(existing) if existing == kv[1] => Ok(()),
        Some(existing) => Err(TsbError::DuplicateTag {
            line,
            key: kv[0].to_string(),
            existing: existing.clone(),
            conflicting: kv[1].to_string(),
        }),
        None => {
            tags.insert(kv[0].to_string(), kv[1].to_string());
            Ok(())
        }
    }
}

/// Type a value field: integer unless it looks like a float literal
pub fn parse_value(field: &str) -> Result<Value> {
    if looks_like_integer(field) {
        let v = parse_signed_integer(field)?;
        i32::try_from(v)
            .map(Value::Integer)
            .map_err(|_| TsbError::NumberFormat {
                input: field.to_string(),
                reason: "integer out of 32-bit range",
            })
    } else {
        field
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| TsbError::NumberFormat {
                input: field.to_string(),
                reason: "invalid float",
            })
    }
}

fn malformed(line: u64, field: &'static str, reason: String) -> TsbError {
    TsbError::MalformedLine {
        line,
        field,
        reason,
    }
}
