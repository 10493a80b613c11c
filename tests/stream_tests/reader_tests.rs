//! Tests for the binary stream readers
//!
//! These tests verify:
//! - StreamReader and FrameScanner yield identical records
//! - Frames split across reads of any size are reassembled
//! - Truncation yields every complete record, then an error
//! - Source errors propagate and the source is released on failure

use std::cell::Cell;
use std::io::{self, Cursor, Read};
use std::rc::Rc;

use tsbench::codec::{encode_header, encode_record};
use tsbench::{
    Config, DataPoint, Dictionary, EncodedPoint, FrameScanner, Loader, StreamReader, TsbError,
    Value,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_points(n: usize) -> (Dictionary, Vec<DataPoint>) {
    let mut dict = Dictionary::new();
    for s in ["sys.cpu", "sys.mem", "host", "web01", "web02", "dc", "east"] {
        dict.intern(s);
    }

    let points = (0..n)
        .map(|i| {
            let metric = if i % 3 == 0 { "sys.mem" } else { "sys.cpu" };
            let value = if i % 2 == 0 {
                Value::Integer(i as i32 - 50)
            } else {
                Value::Float(i as f32 * 0.5)
            };
            let host = if i % 4 < 2 { "web01" } else { "web02" };
            let mut point = DataPoint::new(metric, 1_000 + i as i64, value).with_tag("host", host);
            if i % 5 == 0 {
                point = point.with_tag("dc", "east");
            }
            point
        })
        .collect();

    (dict, points)
}

/// Encoded stream plus the end offset of the header and of each record
fn encode_stream(dict: &Dictionary, points: &[DataPoint]) -> (Vec<u8>, usize, Vec<usize>) {
    let mut bytes = encode_header(dict).unwrap().to_vec();
    let header_len = bytes.len();
    let mut boundaries = Vec::new();

    for point in points {
        bytes.extend_from_slice(&encode_record(point, dict).unwrap());
        boundaries.push(bytes.len());
    }

    (bytes, header_len, boundaries)
}

fn small_config() -> Config {
    Config::builder().buffer_capacity(16).low_water_mark(4).build()
}

fn collect_stream<R: Read>(source: R, config: &Config) -> (Vec<EncodedPoint>, Option<TsbError>) {
    let mut reader = StreamReader::open(source, config).unwrap();
    let mut points = Vec::new();
    loop {
        match reader.next_point() {
            Ok(Some(p)) => points.push(p),
            Ok(None) => return (points, None),
            Err(e) => return (points, Some(e)),
        }
    }
}

fn collect_scan(bytes: &[u8]) -> (Vec<EncodedPoint>, Option<TsbError>) {
    let mut scanner = FrameScanner::open(bytes).unwrap();
    let mut points = Vec::new();
    loop {
        match scanner.next_point() {
            Ok(Some(p)) => points.push(p),
            Ok(None) => return (points, None),
            Err(e) => return (points, Some(e)),
        }
    }
}

/// Serves at most `chunk` bytes per read
struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    reads: Rc<Cell<usize>>,
}

impl ChunkedReader {
    fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk,
            reads: Rc::new(Cell::new(0)),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.set(self.reads.get() + 1);
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Serves its data, then fails instead of reporting end of file
struct FailingReader {
    inner: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionAborted, "source closed")),
            n => Ok(n),
        }
    }
}

/// Records when it is dropped
struct TrackedSource {
    inner: Cursor<Vec<u8>>,
    dropped: Rc<Cell<bool>>,
}

impl Read for TrackedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for TrackedSource {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

// =============================================================================
// Basic Reading Tests
// =============================================================================

#[test]
fn test_read_header_only_stream() {
    let (dict, _) = sample_points(0);
    let (bytes, _, _) = encode_stream(&dict, &[]);

    let mut reader = StreamReader::open(Cursor::new(bytes), &Config::default()).unwrap();

    assert_eq!(reader.dictionary(), &dict);
    assert!(reader.next_point().unwrap().is_none());
    assert_eq!(reader.records_read(), 0);
}

#[test]
fn test_read_records_in_order() {
    let (dict, points) = sample_points(50);
    let (bytes, _, _) = encode_stream(&dict, &points);

    let mut reader = StreamReader::open(Cursor::new(bytes.clone()), &Config::default()).unwrap();

    for (i, original) in points.iter().enumerate() {
        let encoded = reader.next_point().unwrap().unwrap();
        let resolved = encoded.resolve(reader.dictionary()).unwrap();
        assert_eq!(&resolved, original, "Record {} mismatch", i);
    }

    assert!(reader.next_point().unwrap().is_none());
    assert_eq!(reader.records_read(), 50);
    assert_eq!(reader.bytes_consumed(), bytes.len() as u64);
}

#[test]
fn test_end_of_stream_is_sticky() {
    let (dict, points) = sample_points(2);
    let (bytes, _, _) = encode_stream(&dict, &points);

    let mut reader = StreamReader::open(Cursor::new(bytes), &Config::default()).unwrap();
    while reader.next_point().unwrap().is_some() {}

    assert!(reader.next_point().unwrap().is_none());
    assert!(reader.next_point().unwrap().is_none());
}

#[test]
fn test_iterator() {
    let (dict, points) = sample_points(20);
    let (bytes, _, _) = encode_stream(&dict, &points);

    let reader = StreamReader::open(Cursor::new(bytes), &small_config()).unwrap();
    let decoded: Vec<EncodedPoint> = reader.collect::<Result<_, _>>().unwrap();

    assert_eq!(decoded.len(), 20);
}

#[test]
fn test_into_inner_returns_source() {
    let (dict, points) = sample_points(3);
    let (bytes, _, _) = encode_stream(&dict, &points);
    let total = bytes.len() as u64;

    let mut reader = StreamReader::open(Cursor::new(bytes), &Config::default()).unwrap();
    while reader.next_point().unwrap().is_some() {}

    let cursor = reader.into_inner();
    assert_eq!(cursor.position(), total);
}

#[test]
fn test_invalid_config_rejected() {
    let config = Config::builder().buffer_capacity(8).low_water_mark(9).build();

    let result = StreamReader::open(Cursor::new(Vec::new()), &config);
    assert!(matches!(result, Err(TsbError::Config(_))));
}

// =============================================================================
// Streaming Equivalence Tests
// =============================================================================

#[test]
fn test_stream_matches_scanner() {
    let (dict, points) = sample_points(200);
    let (bytes, _, _) = encode_stream(&dict, &points);

    let (scanned, scan_err) = collect_scan(&bytes);
    let (streamed, stream_err) = collect_stream(Cursor::new(bytes.clone()), &Config::default());

    assert!(scan_err.is_none());
    assert!(stream_err.is_none());
    assert_eq!(streamed, scanned);
    assert_eq!(streamed.len(), 200);
}

#[test]
fn test_any_chunking_yields_same_records() {
    let (dict, points) = sample_points(120);
    let (bytes, _, _) = encode_stream(&dict, &points);
    let (expected, _) = collect_scan(&bytes);

    let configs = [
        Config::default(),
        small_config(),
        Config::builder().buffer_capacity(1).low_water_mark(0).build(),
        Config::builder().buffer_capacity(1).low_water_mark(1).build(),
        Config::builder().buffer_capacity(64).low_water_mark(64).build(),
    ];

    for config in &configs {
        for chunk in [1, 2, 3, 7, 13, 64, 1000, usize::MAX] {
            let (streamed, err) = collect_stream(ChunkedReader::new(bytes.clone(), chunk), config);
            assert!(err.is_none(), "chunk {} config {:?}: {:?}", chunk, config, err);
            assert_eq!(streamed, expected, "chunk {} config {:?}", chunk, config);
        }
    }
}

#[test]
fn test_frame_larger_than_buffer() {
    let mut dict = Dictionary::new();
    dict.intern("m");
    let keys: Vec<String> = (0..2000).map(|i| format!("k{i}")).collect();
    for k in &keys {
        dict.intern(k);
    }
    dict.intern("v");

    let mut point = DataPoint::new("m", 1, Value::Integer(1));
    for k in &keys {
        point = point.with_tag(k.as_str(), "v");
    }
    let (bytes, _, _) = encode_stream(&dict, &[point.clone(), point.clone()]);

    let (streamed, err) = collect_stream(ChunkedReader::new(bytes, 100), &small_config());

    assert!(err.is_none());
    assert_eq!(streamed.len(), 2);
    assert_eq!(streamed[1].tags.len(), 2000);
}

#[test]
fn test_refills_only_below_low_water_mark() {
    let (dict, points) = sample_points(1000);
    let (bytes, _, _) = encode_stream(&dict, &points);
    assert!(bytes.len() < 90_000);

    let source = ChunkedReader::new(bytes, usize::MAX);
    let reads = Rc::clone(&source.reads);
    let (streamed, err) = collect_stream(source, &Config::default());

    assert!(err.is_none());
    assert_eq!(streamed.len(), 1000);
    // One read fills the buffer, one more observes end of file
    assert_eq!(reads.get(), 2);
}

// =============================================================================
// Truncation Tests
// =============================================================================

#[test]
fn test_truncated_header() {
    let (dict, points) = sample_points(3);
    let (bytes, header_len, _) = encode_stream(&dict, &points);

    for cut in 0..header_len {
        let stream = StreamReader::open(Cursor::new(bytes[..cut].to_vec()), &small_config());
        assert!(
            matches!(stream, Err(TsbError::TruncatedHeader { available, .. }) if available == cut),
            "stream cut at {}",
            cut
        );

        let scan = FrameScanner::open(&bytes[..cut]);
        assert!(
            matches!(scan, Err(TsbError::TruncatedHeader { available, .. }) if available == cut),
            "scan cut at {}",
            cut
        );
    }
}

#[test]
fn test_truncation_at_every_offset() {
    let (dict, points) = sample_points(12);
    let (bytes, header_len, boundaries) = encode_stream(&dict, &points);
    let (all, _) = collect_scan(&bytes);

    for cut in header_len..=bytes.len() {
        let complete = boundaries.iter().filter(|&&b| b <= cut).count();
        let on_boundary = cut == header_len || boundaries.contains(&cut);

        for (label, (records, err)) in [
            ("stream", collect_stream(ChunkedReader::new(bytes[..cut].to_vec(), 5), &small_config())),
            ("scan", collect_scan(&bytes[..cut])),
        ] {
            assert_eq!(records.len(), complete, "{} cut at {}", label, cut);
            assert_eq!(&records[..], &all[..complete], "{} cut at {}", label, cut);

            if on_boundary {
                assert!(err.is_none(), "{} cut at {}: {:?}", label, cut, err);
            } else {
                let frame_start = if complete == 0 {
                    header_len
                } else {
                    boundaries[complete - 1]
                };
                match err {
                    Some(TsbError::TruncatedRecord {
                        records,
                        offset,
                        available,
                        ..
                    }) => {
                        assert_eq!(records, complete as u64, "{} cut at {}", label, cut);
                        assert_eq!(offset, frame_start as u64, "{} cut at {}", label, cut);
                        assert_eq!(available, cut - frame_start, "{} cut at {}", label, cut);
                    }
                    other => panic!("{} cut at {}: expected TruncatedRecord, got {:?}", label, cut, other),
                }
            }
        }
    }
}

// =============================================================================
// Corrupt Payload Tests
// =============================================================================

/// Header, two good frames, a frame whose value kind is invalid, one good frame
fn stream_with_corrupt_third_frame() -> (Vec<u8>, usize) {
    let (dict, points) = sample_points(4);
    let (mut bytes, _, boundaries) = encode_stream(&dict, &points);

    // frame prefix (2) + metric_id (4) + timestamp (8) puts the kind at +14
    let bad_frame = boundaries[1];
    bytes[bad_frame + 14] = 9;

    (bytes, bad_frame)
}

#[test]
fn test_corrupt_payload_streaming() {
    let (bytes, bad_frame) = stream_with_corrupt_third_frame();

    for chunk in [1, 7, usize::MAX] {
        let (records, err) = collect_stream(ChunkedReader::new(bytes.clone(), chunk), &small_config());

        assert_eq!(records.len(), 2, "chunk {}", chunk);
        match err {
            Some(TsbError::CorruptRecord {
                records, offset, ..
            }) => {
                assert_eq!(records, 2);
                assert_eq!(offset, bad_frame as u64);
            }
            other => panic!("chunk {}: expected CorruptRecord, got {:?}", chunk, other),
        }
    }
}

#[test]
fn test_corrupt_payload_in_memory() {
    let (bytes, bad_frame) = stream_with_corrupt_third_frame();

    let mut scanner = FrameScanner::open(&bytes).unwrap();
    scanner.next_point().unwrap().unwrap();
    scanner.next_point().unwrap().unwrap();

    match scanner.next_point() {
        Err(TsbError::CorruptRecord {
            records,
            offset,
            reason,
        }) => {
            assert_eq!(records, 2);
            assert_eq!(offset, bad_frame as u64);
            assert!(!reason.is_empty());
        }
        other => panic!("Expected CorruptRecord, got {:?}", other),
    }
    assert_eq!(scanner.bytes_consumed(), bad_frame as u64);
}

#[test]
fn test_corrupt_payload_stops_iterator() {
    let (bytes, _) = stream_with_corrupt_third_frame();

    let reader = StreamReader::open(Cursor::new(bytes), &Config::default()).unwrap();
    let results: Vec<_> = reader.collect();

    assert_eq!(results.len(), 3);
    assert!(matches!(results[2], Err(TsbError::CorruptRecord { records: 2, .. })));
}

#[test]
fn test_iterator_stops_after_error() {
    let (dict, points) = sample_points(4);
    let (bytes, _, _) = encode_stream(&dict, &points);
    let cut = bytes.len() - 1;

    let reader = StreamReader::open(Cursor::new(bytes[..cut].to_vec()), &small_config()).unwrap();
    let results: Vec<_> = reader.collect();

    assert_eq!(results.len(), 4);
    assert!(results[..3].iter().all(|r| r.is_ok()));
    assert!(matches!(results[3], Err(TsbError::TruncatedRecord { records: 3, .. })));

    let scanner = FrameScanner::open(&bytes[..cut]).unwrap();
    let scanned: Vec<_> = scanner.collect();
    assert_eq!(scanned.len(), 4);
    assert!(scanned[3].is_err());
}

// =============================================================================
// Source Error and Resource Tests
// =============================================================================

#[test]
fn test_source_error_propagates() {
    let (dict, points) = sample_points(5);
    let (bytes, _, _) = encode_stream(&dict, &points);

    let source = FailingReader {
        inner: Cursor::new(bytes),
    };
    let (records, err) = collect_stream(source, &Config::default());

    // The whole stream fits the first read; the refill below the low-water
    // mark hits the failure before any buffered record is returned
    assert!(records.is_empty());
    match err {
        Some(TsbError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionAborted),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_source_error_during_header() {
    let source = FailingReader {
        inner: Cursor::new(Vec::new()),
    };

    let result = StreamReader::open(source, &Config::default());
    assert!(matches!(result, Err(TsbError::Io(_))));
}

#[test]
fn test_source_released_on_error() {
    let (dict, points) = sample_points(5);
    let (bytes, _, _) = encode_stream(&dict, &points);
    let dropped = Rc::new(Cell::new(false));

    let source = TrackedSource {
        inner: Cursor::new(bytes[..bytes.len() - 2].to_vec()),
        dropped: Rc::clone(&dropped),
    };

    let loader = Loader::new(Config::default()).unwrap();
    let result = loader.load_stream(source);

    assert!(matches!(result, Err(TsbError::TruncatedRecord { records: 4, .. })));
    assert!(dropped.get());
}

#[test]
fn test_source_released_when_reader_dropped() {
    let (dict, points) = sample_points(5);
    let (bytes, _, _) = encode_stream(&dict, &points);
    let dropped = Rc::new(Cell::new(false));

    let source = TrackedSource {
        inner: Cursor::new(bytes),
        dropped: Rc::clone(&dropped),
    };

    let mut reader = StreamReader::open(source, &Config::default()).unwrap();
    reader.next_point().unwrap();
    assert!(!dropped.get());

    drop(reader);
    assert!(dropped.get());
}
