//! Binary record codec
//!
//! Encodes a point against a dictionary and decodes frames back into
//! `EncodedPoint`s with ids left unresolved.

use bincode::Options;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::dictionary::Dictionary;
use crate::error::{Result, TsbError};
use crate::point::{DataPoint, EncodedPoint, TagPair, Value, ValueKind};

use super::frame::{encode_frame, split_frame, FrameSplit};
use super::wire_options;

/// Serialized form of one record
#[derive(Debug, Serialize, Deserialize)]
struct WireRecord {
    metric: u32,
    timestamp: i64,
    kind: ValueKind,
    bits: i32,
    tags: Vec<TagPair>,
}

/// Encode a point as a frame, resolving names through the dictionary
///
/// Every name must already be interned; a missing one is an
/// `UnknownString` error rather than a silent insert.
pub fn encode_record(point: &DataPoint, dictionary: &Dictionary) -> Result<Bytes> {
    point.validate()?;

    let tags = point
        .distinct_tags()
        .map(|tag| {
            Ok(TagPair {
                key_id: dictionary.id_of(&tag.key)?,
                value_id: dictionary.id_of(&tag.value)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    encode_point(&EncodedPoint {
        metric_id: dictionary.id_of(&point.metric)?,
        timestamp: point.timestamp,
        value: point.value,
        tags,
    })
}

/// Encode an already id-resolved point as a frame
pub fn encode_point(point: &EncodedPoint) -> Result<Bytes> {
    let wire = WireRecord {
        metric: point.metric_id,
        timestamp: point.timestamp,
        kind: point.value.kind(),
        bits: point.value.to_bits(),
        tags: point.tags.clone(),
    };
    let payload = wire_options().serialize(&wire)?;
    encode_frame(&payload)
}

/// Decode a record payload (frame prefix already removed)
pub fn decode_record(payload: &[u8]) -> Result<EncodedPoint> {
    let wire: WireRecord = wire_options().deserialize(payload)?;
    Ok(EncodedPoint {
        metric_id: wire.metric,
        timestamp: wire.timestamp,
        value: Value::from_bits(wire.kind, wire.bits),
        tags: wire.tags,
    })
}

/// Split and decode the first record frame of `bytes`
///
/// Returns the point and the number of bytes consumed. A short frame is a
/// `TruncatedRecord` with no complete records counted.
pub fn decode_frame(bytes: &[u8]) -> Result<(EncodedPoint, usize)> {
    match split_frame(bytes) {
        FrameSplit::Complete { payload, consumed } => Ok((decode_record(payload)?, consumed)),
        FrameSplit::Incomplete {
            expected,
            available,
        } => Err(TsbError::TruncatedRecord {
            records: 0,
            offset: 0,
            expected,
            available,
        }),
    }
}
