//! A just-in-time, zero-copy JSON reader.
//!
//! Nothing is parsed ahead of time. A [`Json`] is a cursor into borrowed text,
//! and every accessor scans only the bytes it needs, when it is called:
//! [`Json::value_type`] looks at one byte, [`Json::select`] skips whatever
//! lies before the value it wants, and the converters read one scalar.
//!
//! ```rust
//! use jitjson::{Json, StrMode, select};
//!
//! let doc = Json::from(r#"{"servers": [{"host": "a.example", "port": 8080}]}"#);
//!
//! let port = select!(doc, ".servers[%u].port", 0u32).unwrap();
//! assert_eq!(port.as_int().into_result(), Ok(8080));
//!
//! let host = doc.select(".servers[0].host", &[]).unwrap();
//! let mut buf = [0u8; 16];
//! let n = host.as_str(StrMode::Safe, &mut buf).unwrap();
//! assert_eq!(&buf[..n], b"a.example\0");
//! ```
//!
//! Conversions come in two flavours. Scalars ([`Json::as_bool`],
//! [`Json::as_int`], [`Json::as_double`], ...) always produce a value and
//! report imprecision through [`Lossy`]. Strings and other variable-length
//! output use a size-then-fill protocol: pass an empty buffer to learn the
//! size, then a buffer of that size to receive the bytes. Owned variants
//! ([`Json::as_string`], [`to_json_string`], ...) do both passes for you.
//!
//! Invalid UTF-8 in the text never stops a read. Each offending byte maps to
//! one code point in `U+DC00..=U+DCFF`, and [`StrMode::Unsafe`] output turns it
//! back into the same byte.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod escape;
mod iter;
mod json;
mod literal;
mod number;
mod options;
mod path;
mod scanner;
mod select;
mod string;
mod utf8;

#[cfg(feature = "base64")]
mod binary;
#[cfg(feature = "time")]
mod time;


#[cfg(feature = "base64")]
pub use binary::{base64_from_bytes, to_base64_string};
pub use error::{Error, Lossy, PathSyntax, SelectError};
pub use iter::{ArrayIter, ObjectIter};
pub use json::{Json, ValueType};
pub use literal::{FALSE, NULL, TRUE};
pub use options::StrMode;
pub use path::PathArg;
pub use scanner::MAX_DEPTH;
pub use string::{string_from_str, string_from_unsafe_str, to_json_string, to_unsafe_json_string};
#[cfg(feature = "time")]
pub use time::{time_from, to_time_string};
#[cfg(feature = "fuzzing")]
pub use utf8::{Ucode, decode_raw, decode_sanitized, encode_raw, encode_sanitized, raw_len};

/// Selects a path with placeholder arguments given inline.
///
/// Each argument is converted with [`PathArg::from`], so string slices fill
/// `%s` and integers fill `%u` or `%d`.
///
/// ```rust
/// use jitjson::{Json, SelectError, select};
///
/// let doc = Json::from(r#"{"rows": [[1, 2], [3, 4]]}"#);
/// let cell = select!(doc, ".%s[%u][%d]", "rows", 1u32, 0).unwrap();
/// assert_eq!(cell.as_long().value(), 3);
///
/// assert_eq!(select!(doc, ".rows[%d]", -1).err(), Some(SelectError::NotFound));
/// ```
#[macro_export]
macro_rules! select {
    ($json:expr, $path:expr $(, $arg:expr)* $(,)?) => {
        $json.select($path, &[$($crate::PathArg::from($arg)),*])
    };
}
