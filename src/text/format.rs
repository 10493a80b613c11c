//! Text line formatting
//!
//! Inverse of the line parser, used by the plain text writer.

use std::fmt::Write;

use crate::error::{Result, TsbError};
use crate::point::{DataPoint, Value};

/// Append `metric timestamp value [key=value]*\n` for `point` to `out`
///
/// Names containing a space or `=` could not be parsed back and are rejected,
/// as are non-finite floats.
pub fn format_line(point: &DataPoint, out: &mut String) -> Result<()> {
    point.validate()?;

    if let Value::Float(f) = point.value {
        if !f.is_finite() {
            return Err(TsbError::InvalidRecord(format!(
                "non-finite value {f} for metric {}",
                point.metric
            )));
        }
    }

    check_token(&point.metric, "metric")?;
    for tag in point.distinct_tags() {
        check_token(&tag.key, "tag key")?;
        check_token(&tag.value, "tag value")?;
        if tag.key.is_empty() || tag.value.is_empty() {
            return Err(TsbError::InvalidRecord(format!(
                "empty tag key or value in {}={}",
                tag.key, tag.value
            )));
        }
    }

    write!(out, "{} {} {}", point.metric, point.timestamp, point.value)
        .map_err(|e| TsbError::Serialization(e.to_string()))?;
    for tag in point.distinct_tags() {
        write!(out, " {}={}", tag.key, tag.value)
            .map_err(|e| TsbError::Serialization(e.to_string()))?;
    }
    out.push('\n');

    Ok(())
}

fn check_token(token: &str, what: &str) -> Result<()> {
    if token.contains(&[' ', '=', '\n'][..]) {
        return Err(TsbError::InvalidRecord(format!(
            "{what} {token:?} contains a separator"
        )));
    }
    Ok(())
}
