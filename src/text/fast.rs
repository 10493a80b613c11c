//! Fast primitive parsers
//!
//! Hot-path helpers for the text parser: no regexes, no per-character
//! allocation.

use crate::error::{Result, TsbError};

/// Split `s` on every occurrence of an ASCII `separator`
///
/// Adjacent separators produce empty strings and the result always holds at
/// least one element (the whole string when `separator` never occurs). One
/// pass counts the pieces, a second pass cuts borrowed slices.
///
/// # Panics
///
/// Panics if `separator` is not ASCII.
pub fn split_on(s: &str, separator: u8) -> Vec<&str> {
    assert!(separator.is_ascii(), "separator must be ASCII");

    let bytes = s.as_bytes();
    let count = bytes.iter().filter(|&&b| b == separator).count() + 1;

    let mut parts = Vec::with_capacity(count);
    let mut start = 0;
    for (pos, &b) in bytes.iter().enumerate() {
        if b == separator {
            parts.push(&s[start..pos]);
            start = pos + 1;
        }
    }
    parts.push(&s[start..]);

    parts
}

/// Parse an optionally signed run of ASCII digits as an `i64`
///
/// Equivalent to `str::parse::<i64>` on valid input. The value is
/// accumulated as a negative number so that `i64::MIN` parses without
/// overflowing, while `+9223372036854775808` is rejected.
pub fn parse_signed_integer(s: &str) -> Result<i64> {
    let bytes = s.as_bytes();
    let n = bytes.len();
    if n == 0 {
        return Err(number_error(s, "empty string"));
    }

    let negative = bytes[0] == b'-';
    let digits = if negative || bytes[0] == b'+' {
        if n == 1 {
            return Err(number_error(s, "just a sign, no value"));
        }
        // "+9223372036854775807" / "-9223372036854775808"
        if n > 20 {
            return Err(number_error(s, "value too long"));
        }
        &bytes[1..]
    } else {
        // "9223372036854775807"
        if n > 19 {
            return Err(number_error(s, "value too long"));
        }
        bytes
    };

    let mut v: i64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return Err(number_error(s, "invalid character"));
        }
        v = v
            .checked_mul(10)
            .and_then(|v| v.checked_sub(i64::from(c - b'0')))
            .ok_or_else(|| number_error(s, "overflow"))?;
    }

    if negative {
        Ok(v)
    } else if v == i64::MIN {
        Err(number_error(s, "overflow"))
    } else {
        Ok(-v)
    }
}

/// True if the string has none of the characters found in float literals
///
/// Only looks for `.`, `e` and `E`; it does not validate the digits.
pub fn looks_like_integer(value: &str) -> bool {
    !value.bytes().any(|c| c == b'.' || c == b'e' || c == b'E')
}

fn number_error(input: &str, reason: &'static str) -> TsbError {
    TsbError::NumberFormat {
        input: input.to_string(),
        reason,
    }
}
