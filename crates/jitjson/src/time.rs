//! RFC 3339 timestamps inside JSON strings.
//!
//! Accepted input is `yyyy-mm-ddThh:mm:ss[.fff](Z|+hh:mm|-hh:mm)` inside
//! double quotes. The separator may also be `t` or a space and the zone may
//! be `z`. Fractional seconds are read and dropped. Escapes in the string
//! are expanded before the date is read. Years run from 0000 to 9999.

use alloc::string::String;

use chrono::{DateTime, Datelike as _, NaiveDate, Timelike as _};
use log::debug;

use crate::{
    escape::decode_escaped,
    error::Error,
    json::Json,
    scanner::is_white,
    utf8::{Sink, Ucode, collect},
};

/// Reads date characters from the inside of a quoted string.
struct DateReader<'a> {
    text: &'a [u8],
    pos: usize,
}

impl DateReader<'_> {
    /// The next character, or 0 at the closing quote or end of text.
    fn peek(&self) -> (Ucode, usize) {
        match self.text.get(self.pos) {
            None | Some(&b'"') => (0, 0),
            Some(_) => decode_escaped(&self.text[self.pos..]),
        }
    }

    fn next(&mut self) -> Ucode {
        let (u, n) = self.peek();
        self.pos += n;
        u
    }

    fn expect(&mut self, want: u8) -> Result<(), Error> {
        if self.next() == Ucode::from(want) {
            Ok(())
        } else {
            Err(Error::Invalid)
        }
    }

    /// Exactly `width` decimal digits, with no more following.
    fn number(&mut self, width: usize) -> Result<u32, Error> {
        let mut value = 0;
        let mut digits = 0;
        while let (u @ 0x30..=0x39, n) = self.peek() {
            value = value * 10 + (u - 0x30);
            digits += 1;
            self.pos += n;
            if digits > width {
                return Err(Error::Invalid);
            }
        }
        if digits == width {
            Ok(value)
        } else {
            Err(Error::Invalid)
        }
    }

    fn skip_white(&mut self) {
        while self.text.get(self.pos).copied().is_some_and(is_white) {
            self.pos += 1;
        }
    }
}

/// The fields of one timestamp, before calendar checks.
struct Fields {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    /// Seconds east of UTC.
    offset: i64,
}

fn read_fields(r: &mut DateReader<'_>) -> Result<Fields, Error> {
    let year = r.number(4)?;
    r.expect(b'-')?;
    let month = r.number(2)?;
    r.expect(b'-')?;
    let day = r.number(2)?;
    if !matches!(r.next(), 0x54 | 0x74 | 0x20) {
        return Err(Error::Invalid);
    }
    let hour = r.number(2)?;
    r.expect(b':')?;
    let minute = r.number(2)?;
    r.expect(b':')?;
    let second = r.number(2)?;

    let mut zone = r.next();
    if zone == Ucode::from(b'.') {
        zone = r.next();
        while (0x30..=0x39).contains(&zone) {
            zone = r.next();
        }
    }
    let offset = match zone {
        0x5a | 0x7a => 0,
        0x2b | 0x2d => {
            let hours = r.number(2)?;
            r.expect(b':')?;
            let minutes = r.number(2)?;
            if hours > 23 || minutes > 59 {
                return Err(Error::Invalid);
            }
            let offset = i64::from(hours * 3600 + minutes * 60);
            if zone == 0x2d { -offset } else { offset }
        }
        _ => return Err(Error::Invalid),
    };

    Ok(Fields {
        year,
        month,
        day,
        hour,
        minute,
        second,
        offset,
    })
}

impl Json<'_> {
    /// Reads the RFC 3339 timestamp at the cursor as seconds since the Unix
    /// epoch.
    ///
    /// Whitespace just inside the quotes is allowed. A leap second (`:60` or
    /// `:61`) reads as `:59`, since Unix time has no room for it.
    ///
    /// ```rust
    /// use jitjson::Json;
    ///
    /// assert_eq!(Json::from(r#""2000-01-01T00:00:00Z""#).as_time(), Ok(946_684_800));
    /// assert_eq!(Json::from(r#""2000-01-01 01:00:00+01:00""#).as_time(), Ok(946_684_800));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] when the cursor is not on a double-quoted string
    /// holding exactly one timestamp, or the date or time does not exist.
    pub fn as_time(&self) -> Result<i64, Error> {
        let rest = self.value_scanner().rest();
        if rest.first() != Some(&b'"') {
            return Err(Error::Invalid);
        }
        let mut r = DateReader { text: rest, pos: 1 };
        r.skip_white();
        let fields = read_fields(&mut r)?;
        r.skip_white();
        if rest.get(r.pos) != Some(&b'"') {
            return Err(Error::Invalid);
        }
        timestamp(&fields)
    }
}

fn timestamp(f: &Fields) -> Result<i64, Error> {
    let second = match f.second {
        60 | 61 => {
            debug!("leap second {}:{}:{} read as :59", f.hour, f.minute, f.second);
            59
        }
        s => s,
    };
    let year = i32::try_from(f.year).map_err(|_| Error::Invalid)?;
    let utc = NaiveDate::from_ymd_opt(year, f.month, f.day)
        .and_then(|date| date.and_hms_opt(f.hour, f.minute, second))
        .ok_or(Error::Invalid)?
        .and_utc()
        .timestamp();
    Ok(utc - f.offset)
}

/// Writes `t`, in seconds since the Unix epoch, as a quoted
/// `"YYYY-MM-DDTHH:MM:SSZ"` string followed by a NUL.
///
/// Returns the number of bytes used (always 23); pass an empty `dst` to
/// learn that size.
///
/// ```rust
/// let mut buf = [0u8; 23];
/// assert_eq!(jitjson::time_from(1_000_000_000, &mut buf), Ok(23));
/// assert_eq!(&buf, b"\"2001-09-09T01:46:40Z\"\0");
/// ```
///
/// # Errors
///
/// - [`Error::Range`] when `t` falls outside the years 0000 to 9999.
/// - [`Error::BufferTooSmall`] when `dst` is non-empty but too short.
pub fn time_from(t: i64, dst: &mut [u8]) -> Result<usize, Error> {
    let mut out = Sink::new(dst);
    let Some(at) = DateTime::from_timestamp(t, 0).filter(|at| (0..=9999).contains(&at.year()))
    else {
        return Err(out.fail(Error::Range));
    };
    out.push(b'"');
    push_digits(&mut out, at.year().unsigned_abs(), 4);
    out.push(b'-');
    push_digits(&mut out, at.month(), 2);
    out.push(b'-');
    push_digits(&mut out, at.day(), 2);
    out.push(b'T');
    push_digits(&mut out, at.hour(), 2);
    out.push(b':');
    push_digits(&mut out, at.minute(), 2);
    out.push(b':');
    push_digits(&mut out, at.second(), 2);
    out.extend(b"Z\"");
    out.finish()
}

/// [`time_from`] into an owned [`String`], without the NUL.
///
/// # Errors
///
/// [`Error::Range`] when `t` falls outside the years 0000 to 9999.
pub fn to_time_string(t: i64) -> Result<String, Error> {
    let mut bytes = collect(|dst| time_from(t, dst))?;
    bytes.pop();
    String::from_utf8(bytes).map_err(|_| Error::Invalid)
}

#[allow(clippy::cast_possible_truncation)]
fn push_digits(out: &mut Sink<'_>, value: u32, width: u32) {
    for place in (0..width).rev() {
        out.push(b'0' + (value / 10u32.pow(place) % 10) as u8);
    }
}
