//! Best-effort numeric conversion.
//!
//! Numbers are read with C-library prefix semantics: the float reader takes
//! decimal, hexadecimal, `inf` and `nan` spellings, and the integer reader
//! takes decimal, `0x` hexadecimal and leading-zero octal. Whether the text
//! was a strictly valid JSON number is decided separately and only affects
//! the [`Error::Invalid`] flag, never the value.
//!
//! Quoted numbers are read straight after the opening quote with no escape
//! processing, so `"\u0030"` is not zero.

use crate::{
    error::{Error, Lossy},
    json::Json,
    scanner::is_delimiter,
};

/// A number read from the front of some bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Prefix<T> {
    pub(crate) value: T,
    /// Bytes consumed, including leading whitespace and sign.
    pub(crate) len: usize,
    /// The magnitude did not fit and `value` was clamped.
    pub(crate) overflow: bool,
}

/// Whitespace the C number readers skip before a number.
const fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn byte(bytes: &[u8], i: usize) -> u8 {
    bytes.get(i).copied().unwrap_or(0)
}

fn count_digits(bytes: &[u8], from: usize, radix: u32) -> usize {
    bytes
        .get(from..)
        .unwrap_or_default()
        .iter()
        .take_while(|&&b| char::from(b).is_digit(radix))
        .count()
}

/// Leading whitespace and an optional sign. Returns `(index, negative)`.
fn sign(bytes: &[u8]) -> (usize, bool) {
    let mut i = bytes.iter().take_while(|&&b| is_c_space(b)).count();
    let negative = byte(bytes, i) == b'-';
    if matches!(byte(bytes, i), b'+' | b'-') {
        i += 1;
    }
    (i, negative)
}

/// Reads a floating-point prefix like C `strtod`.
///
/// Returns `None` when no number starts here. Overflow yields an infinity
/// with `overflow` set; underflow quietly yields zero.
pub(crate) fn read_double(bytes: &[u8]) -> Option<Prefix<f64>> {
    let (start, negative) = sign(bytes);
    let body = bytes.get(start..).unwrap_or_default();

    let (magnitude, used, finite) = if let Some((v, n)) = read_special(body) {
        (v, n, false)
    } else if let Some((v, n)) = read_hex_double(body) {
        (v, n, true)
    } else {
        let n = decimal_len(body)?;
        let text = core::str::from_utf8(&body[..n]).ok()?;
        (text.parse::<f64>().ok()?, n, true)
    };

    let value = if negative { -magnitude } else { magnitude };
    Some(Prefix {
        value,
        len: start + used,
        overflow: finite && value.is_infinite(),
    })
}

/// Length of `digits [. digits] [e [sign] digits]`, needing a digit somewhere
/// in the mantissa.
fn decimal_len(body: &[u8]) -> Option<usize> {
    let int = count_digits(body, 0, 10);
    let mut n = int;
    let mut frac = 0;
    if byte(body, n) == b'.' {
        frac = count_digits(body, n + 1, 10);
        n += 1 + frac;
    }
    if int == 0 && frac == 0 {
        return None;
    }
    if matches!(byte(body, n), b'e' | b'E') {
        let mut e = n + 1;
        if matches!(byte(body, e), b'+' | b'-') {
            e += 1;
        }
        let exp = count_digits(body, e, 10);
        if exp > 0 {
            n = e + exp;
        }
    }
    Some(n)
}

fn read_special(body: &[u8]) -> Option<(f64, usize)> {
    let starts = |word: &[u8]| body.get(..word.len()).is_some_and(|b| b.eq_ignore_ascii_case(word));
    if starts(b"infinity") {
        return Some((f64::INFINITY, 8));
    }
    if starts(b"inf") {
        return Some((f64::INFINITY, 3));
    }
    if !starts(b"nan") {
        return None;
    }
    let mut n = 3;
    if byte(body, n) == b'(' {
        let inner = body[n + 1..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
            .count();
        if byte(body, n + 1 + inner) == b')' {
            n += inner + 2;
        }
    }
    Some((f64::NAN, n))
}

/// `0x` hex mantissa with optional fraction and binary `p` exponent.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn read_hex_double(body: &[u8]) -> Option<(f64, usize)> {
    if !(byte(body, 0) == b'0' && matches!(byte(body, 1), b'x' | b'X')) {
        return None;
    }
    let int = count_digits(body, 2, 16);
    let mut n = 2 + int;
    let mut frac = 0;
    if byte(body, n) == b'.' {
        frac = count_digits(body, n + 1, 16);
    }
    if int == 0 && frac == 0 {
        return None;
    }
    let mut mantissa: u64 = 0;
    let mut exp: i64 = 0;
    for &b in &body[2..2 + int] {
        let d = u64::from(char::from(b).to_digit(16).unwrap_or(0));
        if mantissa >> 56 == 0 {
            mantissa = mantissa << 4 | d;
        } else {
            exp += 4;
        }
    }
    if byte(body, n) == b'.' {
        for &b in &body[n + 1..n + 1 + frac] {
            let d = u64::from(char::from(b).to_digit(16).unwrap_or(0));
            if mantissa >> 56 == 0 {
                mantissa = mantissa << 4 | d;
                exp -= 4;
            }
        }
        n += 1 + frac;
    }
    if matches!(byte(body, n), b'p' | b'P') {
        let mut e = n + 1;
        let negative = byte(body, e) == b'-';
        if matches!(byte(body, e), b'+' | b'-') {
            e += 1;
        }
        let digits = count_digits(body, e, 10);
        if digits > 0 {
            let p = body[e..e + digits]
                .iter()
                .fold(0i64, |acc, &b| (acc * 10 + i64::from(b - b'0')).min(100_000));
            exp += if negative { -p } else { p };
            n = e + digits;
        }
    }
    Some((scale2(mantissa as f64, exp), n))
}

fn scale2(mut value: f64, exp: i64) -> f64 {
    let exp = exp.clamp(-2200, 2200);
    let (factor, steps) = if exp < 0 { (0.5, -exp) } else { (2.0, exp) };
    for _ in 0..steps {
        value *= factor;
    }
    value
}

/// Reads an integer prefix like C `strtol` with base 0.
pub(crate) fn read_long(bytes: &[u8]) -> Option<Prefix<i64>> {
    let (start, negative) = sign(bytes);
    let hex = byte(bytes, start) == b'0'
        && matches!(byte(bytes, start + 1), b'x' | b'X')
        && char::from(byte(bytes, start + 2)).is_ascii_hexdigit();
    let (radix, first) = match (hex, byte(bytes, start)) {
        (true, _) => (16, start + 2),
        (false, b'0') => (8, start),
        _ => (10, start),
    };
    let digits = count_digits(bytes, first, radix);
    if digits == 0 {
        return None;
    }

    let mut magnitude: u64 = 0;
    let mut overflow = false;
    for &b in &bytes[first..first + digits] {
        let d = u64::from(char::from(b).to_digit(radix).unwrap_or(0));
        match magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(d))
        {
            Some(m) => magnitude = m,
            None => overflow = true,
        }
    }

    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    let (value, overflow) = match value {
        Some(v) if !overflow => (v, false),
        _ if negative => (i64::MIN, true),
        _ => (i64::MAX, true),
    };
    Some(Prefix {
        value,
        len: first + digits,
        overflow,
    })
}

/// `-?(0|[1-9][0-9]*)(.[0-9]+)?([eE][+-]?[0-9]+)?` followed by a delimiter.
pub(crate) fn is_strict_number(bytes: &[u8]) -> bool {
    let mut i = usize::from(byte(bytes, 0) == b'-');
    match byte(bytes, i) {
        b'0' => i += 1,
        b'1'..=b'9' => i += count_digits(bytes, i, 10),
        _ => return false,
    }
    if byte(bytes, i) == b'.' {
        let frac = count_digits(bytes, i + 1, 10);
        if frac == 0 {
            return false;
        }
        i += 1 + frac;
    }
    if matches!(byte(bytes, i), b'e' | b'E') {
        i += 1;
        if matches!(byte(bytes, i), b'+' | b'-') {
            i += 1;
        }
        let exp = count_digits(bytes, i, 10);
        if exp == 0 {
            return false;
        }
        i += exp;
    }
    is_delimiter(byte(bytes, i))
}

/// 2^63, the first double above every `i64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

impl Json<'_> {
    /// Converts the value at the cursor to a double.
    ///
    /// Strict JSON numbers convert exactly. Other numeric spellings (`+1`,
    /// `.5`, `0x1f`, `1e999`) still convert but are flagged. A quoted number
    /// converts only when nothing but whitespace follows it inside the quotes,
    /// and is always flagged. Everything else is `NaN` with
    /// [`Error::Invalid`].
    #[must_use]
    pub fn as_double(&self) -> Lossy<f64> {
        let rest = self.value_scanner().rest();
        if let Some(&quote @ (b'"' | b'\'')) = rest.first() {
            let inner = &rest[1..];
            let value = read_double(inner).map_or(f64::NAN, |p| {
                let after = inner[p.len..]
                    .iter()
                    .position(|&b| !crate::scanner::is_white(b))
                    .map_or(0, |i| inner[p.len + i]);
                if after == quote { p.value } else { f64::NAN }
            });
            return Lossy::with(value, Error::Invalid);
        }
        match read_double(rest) {
            None => Lossy::with(f64::NAN, Error::Invalid),
            Some(p) if !is_strict_number(rest) => Lossy::with(p.value, Error::Invalid),
            Some(p) if p.overflow => Lossy::with(p.value, Error::Range),
            Some(p) => Lossy::exact(p.value),
        }
    }

    /// Converts the value at the cursor to a 64-bit integer.
    ///
    /// Integers that end at a delimiter are read directly (so `010` is octal
    /// and `0x1f` is hex, both flagged). Anything else goes through
    /// [`Json::as_double`] and is truncated toward zero. Out-of-range values
    /// clamp, flagged [`Error::Range`] unless the text was already
    /// [`Error::Invalid`]; `NaN` becomes 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_long(&self) -> Lossy<i64> {
        let rest = self.value_scanner().rest();
        if let Some(p) = read_long(rest) {
            if is_delimiter(byte(rest, p.len)) {
                let error = if !is_strict_number(rest) {
                    Some(Error::Invalid)
                } else if p.overflow {
                    Some(Error::Range)
                } else {
                    None
                };
                return Lossy::new(p.value, error);
            }
        }

        let double = self.as_double();
        let fp = double.value();
        let clamped = double.error().unwrap_or(Error::Range);
        if fp.is_nan() {
            return Lossy::with(0, clamped);
        }
        if fp < -TWO_POW_63 {
            return Lossy::with(i64::MIN, clamped);
        }
        if fp >= TWO_POW_63 {
            return Lossy::with(i64::MAX, clamped);
        }
        Lossy::new(fp as i64, double.error())
    }

    /// Converts the value at the cursor to a 32-bit integer, clamping the
    /// result of [`Json::as_long`] with [`Error::Range`].
    #[must_use]
    pub fn as_int(&self) -> Lossy<i32> {
        let long = self.as_long();
        match i32::try_from(long.value()) {
            Ok(v) => long.map(|_| v),
            Err(_) if long.value() < 0 => Lossy::with(i32::MIN, Error::Range),
            Err(_) => Lossy::with(i32::MAX, Error::Range),
        }
    }
}
