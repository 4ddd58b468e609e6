//! JSON string escapes, in both directions.
//!
//! Decoding layers escape handling on top of [`decode_sanitized`]. A
//! backslash that does not begin a recognised escape is treated as one
//! invalid byte (`U+DC5C`). The bytes after it are left to be read again as
//! ordinary content. This covers an unknown letter, a short or non-hex
//! `\u`, and an unpaired or reversed surrogate. `\u0000` decodes to `U+DC00`,
//! the same code point a raw NUL byte would sanitize to.
//!
//! Encoding writes the short escapes for `\b \t \n \f \r \\ \"`, `\u00xx` with
//! lowercase hex for the remaining control characters and for `U+DC00`, and
//! everything else through [`Sink::push_sanitized`].

use crate::{
    error::Error,
    utf8::{Sink, Ucode, decode_sanitized, is_surrogate_hi, is_surrogate_lo},
};

/// The sanitized code point standing for a lone backslash.
pub(crate) const BAD_BACKSLASH: Ucode = 0xdc5c;

/// The sanitized code point for `\u0000`, which has no place in a C string.
const NUL_ESCAPE: Ucode = 0xdc00;

const HEX: &[u8; 16] = b"0123456789abcdef";

pub(crate) fn hex_val(b: u8) -> Option<Ucode> {
    char::from(b).to_digit(16)
}

/// Exactly four hex digits from the front of `bytes`.
pub(crate) fn four_hex(bytes: &[u8]) -> Option<Ucode> {
    let digits = bytes.get(..4)?;
    digits
        .iter()
        .try_fold(0, |acc, &b| Some(acc << 4 | hex_val(b)?))
}

/// Decodes one character of quoted-string content, expanding escapes.
///
/// Returns the sanitized code point and how many bytes it used. Empty input
/// yields `(0, 0)`.
pub(crate) fn decode_escaped(bytes: &[u8]) -> (Ucode, usize) {
    let (u, n) = decode_sanitized(bytes);
    if u != Ucode::from(b'\\') {
        return (u, n);
    }
    match escape_after_backslash(&bytes[1..]) {
        Some((u, used)) => (u, 1 + used),
        None => (BAD_BACKSLASH, 1),
    }
}

fn escape_after_backslash(bytes: &[u8]) -> Option<(Ucode, usize)> {
    let simple = match *bytes.first()? {
        b'"' => 0x22,
        b'\'' => 0x27,
        b'\\' => 0x5c,
        b'/' => 0x2f,
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => 0x0a,
        b'r' => 0x0d,
        b't' => 0x09,
        b'u' => return unicode_escape(&bytes[1..]),
        _ => return None,
    };
    Some((simple, 1))
}

/// The part of `\uXXXX` after the `u`, with RFC 7159 surrogate pairs.
fn unicode_escape(bytes: &[u8]) -> Option<(Ucode, usize)> {
    let hi = four_hex(bytes)?;
    if hi == 0 {
        return Some((NUL_ESCAPE, 5));
    }
    if is_surrogate_lo(hi) {
        return None;
    }
    if !is_surrogate_hi(hi) {
        return Some((hi, 5));
    }
    let rest = bytes.get(4..)?;
    if !rest.starts_with(b"\\u") {
        return None;
    }
    let lo = four_hex(&rest[2..])?;
    if !is_surrogate_lo(lo) {
        return None;
    }
    let u = ((hi & 0x3ff) << 10 | (lo & 0x3ff)) + 0x1_0000;
    Some((u, 11))
}

/// Writes `\uXXXX` for a code point in the basic plane.
pub(crate) fn push_uescape(out: &mut Sink<'_>, u: Ucode) {
    out.extend(b"\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[(u >> shift & 0xf) as usize]);
    }
}

/// Writes one sanitized code point as JSON string content.
pub(crate) fn push_escaped(out: &mut Sink<'_>, u: Ucode) -> Result<(), Error> {
    let short = match u {
        0x08 => b'b',
        0x09 => b't',
        0x0a => b'n',
        0x0c => b'f',
        0x0d => b'r',
        0x5c => b'\\',
        0x22 => b'"',
        NUL_ESCAPE => {
            push_uescape(out, 0);
            return Ok(());
        }
        0..0x20 => {
            push_uescape(out, u);
            return Ok(());
        }
        _ => return out.push_sanitized(u),
    };
    out.extend(&[b'\\', short]);
    Ok(())
}
