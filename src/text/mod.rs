//! Text Module
//!
//! The self-describing text encoding: one record per line.
//!
//! ## Line Format
//! ```text
//! <metric> <timestamp> <value> [<key>=<value> ...]
//! sys.cpu 1262304000 42 host=web01 dc=east
//! ```
//!
//! Fields are separated by a single ASCII space, with no quoting.
//!
//! ## Validation Order
//! 1. metric non-empty
//! 2. timestamp is an integer and > 0
//! 3. value non-empty
//! 4. each tag token is exactly `key=value`, both sides non-empty
//! 5. a repeated key must carry the same value
//! 6. value typed as integer, or float if it contains `.`, `e` or `E`
//!
//! Errors from [`LineParser::parse_line`] are `MalformedLine` (with the line
//! number and field) or `DuplicateTag`.

mod fast;
mod format;
mod parser;

pub use fast::{looks_like_integer, parse_signed_integer, split_on};
pub use format::format_line;
pub use parser::{parse_value, LineParser, SeriesKey, SeriesRegistry};
