//! UTF-8 codec with a lossless mapping for invalid bytes.
//!
//! What it does
//! - Decodes shortest-form UTF-8 (RFC 3629), rejecting truncated and overlong
//!   sequences without consuming anything.
//! - Sanitizes: every byte that cannot start a usable code point becomes one
//!   code point in `U+DC00..=U+DCFF`, so decoding always makes progress.
//! - Encodes in both directions: raw (any value below `0x20_0000`, surrogates
//!   included) and sanitized (which unwraps `U+DCxx` back to the byte `xx`).
//!
//! Invariants
//! - A sanitized code point is never 0, never a high surrogate, and never
//!   above `U+10FFFF`. 0 is reserved for "end of input".
//! - `encode_sanitized(decode_sanitized(b))` reproduces `b` byte for byte.
//!
//! [`Sink`] is the output side of the two-pass size-then-fill protocol used by
//! every buffer-writing function in the crate.

use alloc::{vec, vec::Vec};

use crate::error::Error;

/// A Unicode code point, possibly a surrogate or a sanitized byte.
pub type Ucode = u32;

pub(crate) const fn is_surrogate(u: Ucode) -> bool {
    u & !0x7ff == 0xd800
}

pub(crate) const fn is_surrogate_hi(u: Ucode) -> bool {
    u & !0x3ff == 0xd800
}

pub(crate) const fn is_surrogate_lo(u: Ucode) -> bool {
    u & !0x3ff == 0xdc00
}

/// Code points carrying one invalid input byte.
pub(crate) const fn is_dcxx(u: Ucode) -> bool {
    u & !0xff == 0xdc00
}

/// Code points that strict UTF-8 output may contain.
pub(crate) const fn is_utf8_safe(u: Ucode) -> bool {
    u <= 0x10_ffff && !is_surrogate(u)
}

const fn continuation(b: u8) -> Option<Ucode> {
    if b & 0xc0 == 0x80 {
        Some((b & 0x3f) as Ucode)
    } else {
        None
    }
}

/// Decodes one shortest-form UTF-8 sequence from the front of `bytes`.
///
/// Returns the code point and the number of bytes it occupied, or `None` for
/// a truncated, overlong or otherwise malformed sequence. Surrogates and
/// values up to `U+1FFFFF` are returned as-is; the caller decides whether
/// they are acceptable.
#[must_use]
pub fn decode_raw(bytes: &[u8]) -> Option<(Ucode, usize)> {
    let &b0 = bytes.first()?;
    let cont = |i: usize| bytes.get(i).copied().and_then(continuation);
    let lead = Ucode::from(b0);
    if b0 & 0x80 == 0 {
        return Some((lead, 1));
    }
    if b0 & 0xe0 == 0xc0 {
        let u = (lead & 0x1f) << 6 | cont(1)?;
        return (u >= 0x80).then_some((u, 2));
    }
    if b0 & 0xf0 == 0xe0 {
        let u = (lead & 0x0f) << 12 | cont(1)? << 6 | cont(2)?;
        return (u >= 0x800).then_some((u, 3));
    }
    if b0 & 0xf8 == 0xf0 {
        let u = (lead & 0x07) << 18 | cont(1)? << 12 | cont(2)? << 6 | cont(3)?;
        return (u >= 0x1_0000).then_some((u, 4));
    }
    None
}

/// Decodes one sanitized code point from the front of `bytes`.
///
/// Never fails on non-empty input: anything [`decode_raw`] rejects, and any
/// decoded 0, surrogate or value above `U+10FFFF`, becomes
/// `0xDC00 | first_byte` and consumes exactly one byte. Empty input yields
/// `(0, 0)`.
#[must_use]
pub fn decode_sanitized(bytes: &[u8]) -> (Ucode, usize) {
    let Some(&b0) = bytes.first() else {
        return (0, 0);
    };
    match decode_raw(bytes) {
        Some((u, n)) if u != 0 && u <= 0x10_ffff && !is_surrogate(u) => (u, n),
        _ => (0xdc00 | Ucode::from(b0), 1),
    }
}

/// Number of bytes [`encode_raw`] needs for `u`, or `None` above `U+1FFFFF`.
#[must_use]
pub const fn raw_len(u: Ucode) -> Option<usize> {
    match u {
        0..0x80 => Some(1),
        0x80..0x800 => Some(2),
        0x800..0x1_0000 => Some(3),
        0x1_0000..0x20_0000 => Some(4),
        _ => None,
    }
}

/// Encodes `u` as shortest-form UTF-8 without treating any value specially.
///
/// Returns the encoded length. The bytes are written only when `buf` can hold
/// all of them, so a zero-length `buf` is a pure size query. Values at or
/// above `0x20_0000` have no encoding and yield `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_raw(u: Ucode, buf: &mut [u8]) -> Option<usize> {
    let len = raw_len(u)?;
    let Some(out) = buf.get_mut(..len) else {
        return Some(len);
    };
    match len {
        1 => out[0] = u as u8,
        2 => {
            out[0] = 0xc0 | (u >> 6) as u8;
            out[1] = 0x80 | (u & 0x3f) as u8;
        }
        3 => {
            out[0] = 0xe0 | (u >> 12) as u8;
            out[1] = 0x80 | (u >> 6 & 0x3f) as u8;
            out[2] = 0x80 | (u & 0x3f) as u8;
        }
        _ => {
            out[0] = 0xf0 | (u >> 18) as u8;
            out[1] = 0x80 | (u >> 12 & 0x3f) as u8;
            out[2] = 0x80 | (u >> 6 & 0x3f) as u8;
            out[3] = 0x80 | (u & 0x3f) as u8;
        }
    }
    Some(len)
}

/// Encodes a sanitized code point into dirty UTF-8.
///
/// `U+DCxx` unwraps to the single byte `xx`; everything else goes through
/// [`encode_raw`]. Same size-query behaviour as [`encode_raw`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_sanitized(u: Ucode, buf: &mut [u8]) -> Option<usize> {
    if is_dcxx(u) {
        if let Some(first) = buf.first_mut() {
            *first = (u & 0xff) as u8;
        }
        return Some(1);
    }
    encode_raw(u, buf)
}

/// Output cursor for the size-then-fill protocol.
///
/// Every byte is counted; bytes are stored only while they fit. A zero-length
/// buffer therefore measures the output without writing anything.
pub(crate) struct Sink<'b> {
    buf: &'b mut [u8],
    len: usize,
}

impl<'b> Sink<'b> {
    pub(crate) fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.len) {
            *slot = byte;
        }
        self.len += 1;
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// Writes `u` with [`encode_raw`], so `U+DCxx` takes three bytes.
    pub(crate) fn push_raw(&mut self, u: Ucode) -> Result<(), Error> {
        let mut tmp = [0u8; 4];
        let n = encode_raw(u, &mut tmp).ok_or(Error::Invalid)?;
        self.extend(&tmp[..n]);
        Ok(())
    }

    /// Writes `u` with [`encode_sanitized`], so `U+DCxx` takes one byte.
    pub(crate) fn push_sanitized(&mut self, u: Ucode) -> Result<(), Error> {
        let mut tmp = [0u8; 4];
        let n = encode_sanitized(u, &mut tmp).ok_or(Error::Invalid)?;
        self.extend(&tmp[..n]);
        Ok(())
    }

    /// Terminates the output with NUL and settles the two-pass result.
    pub(crate) fn finish(mut self) -> Result<usize, Error> {
        self.push(0);
        self.settle()
    }

    /// Settles binary output, which carries no terminator.
    pub(crate) fn settle(self) -> Result<usize, Error> {
        if !self.buf.is_empty() && self.len > self.buf.len() {
            let needed = self.len;
            return Err(self.fail(Error::BufferTooSmall { needed }));
        }
        Ok(self.len)
    }

    /// Abandons the output, leaving an empty string behind when possible.
    pub(crate) fn fail(self, err: Error) -> Error {
        if let Some(first) = self.buf.first_mut() {
            *first = 0;
        }
        err
    }
}

/// Runs a two-pass writer twice, first to size and then to fill an owned
/// buffer. The result keeps any trailing NUL the writer emitted.
pub(crate) fn collect(fill: impl Fn(&mut [u8]) -> Result<usize, Error>) -> Result<Vec<u8>, Error> {
    let needed = fill(&mut [])?;
    let mut buf = vec![0; needed];
    let len = fill(&mut buf)?;
    buf.truncate(len);
    Ok(buf)
}
