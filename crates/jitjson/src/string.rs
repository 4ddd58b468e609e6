//! Strings in both directions, plus comparison without decoding.
//!
//! Decoding accepts double- or single-quoted strings with escapes, and bare
//! words copied as they are. Encoding always produces a double-quoted JSON
//! string. Every writer here follows the two-pass protocol: an empty buffer
//! asks for the size, including the trailing NUL.

use alloc::string::String;
use core::cmp::Ordering;

use bstr::BString;

use crate::{
    error::Error,
    escape::{decode_escaped, push_escaped},
    json::Json,
    literal::NULL,
    options::StrMode,
    scanner::{is_delimiter, is_word_char, is_word_start},
    utf8::{Sink, Ucode, collect, decode_raw, decode_sanitized, is_utf8_safe},
};

impl Json<'_> {
    /// Copies the string or bare word at the cursor into `buf` as UTF-8,
    /// followed by a NUL.
    ///
    /// Returns the number of bytes used, NUL included. Pass an empty `buf`
    /// to learn that size without writing anything. In [`StrMode::Safe`] the
    /// output is strict UTF-8; in [`StrMode::Unsafe`] invalid input bytes come
    /// out as the 3-byte encodings of U+DC00..U+DCFF.
    ///
    /// # Errors
    ///
    /// - [`Error::Invalid`] when the cursor is not on a string or word, the
    ///   string is unterminated, or (in safe mode) the output would not be
    ///   strict UTF-8.
    /// - [`Error::BufferTooSmall`] when `buf` is non-empty but too short.
    ///
    /// On error a non-empty `buf` starts with a NUL.
    pub fn as_str(&self, mode: StrMode, buf: &mut [u8]) -> Result<usize, Error> {
        let mut out = Sink::new(buf);
        match self.decode_into(mode, &mut out) {
            Ok(()) => out.finish(),
            Err(err) => Err(out.fail(err)),
        }
    }

    /// The string or bare word at the cursor as an owned, strict UTF-8
    /// [`String`].
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] as for [`Json::as_str`] in safe mode.
    pub fn as_string(&self) -> Result<String, Error> {
        let mut bytes = collect(|buf| self.as_str(StrMode::Safe, buf))?;
        bytes.pop();
        String::from_utf8(bytes).map_err(|_| Error::Invalid)
    }

    /// The string or bare word at the cursor as UTF-8B bytes, keeping invalid
    /// input bytes as U+DC00..U+DCFF.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] when the cursor is not on a string or word, or the
    /// string is unterminated.
    pub fn as_unsafe_bytes(&self) -> Result<BString, Error> {
        let mut bytes = collect(|buf| self.as_str(StrMode::Unsafe, buf))?;
        bytes.pop();
        Ok(BString::from(bytes))
    }

    fn decode_into(&self, mode: StrMode, out: &mut Sink<'_>) -> Result<(), Error> {
        let rest = self.value_scanner().rest();
        let (quote, mut i) = match rest.first() {
            Some(&q @ (b'"' | b'\'')) => (Some(q), 1),
            Some(&b) if is_word_start(b) => (None, 0),
            _ => return Err(Error::Invalid),
        };
        loop {
            let b = rest.get(i).copied().unwrap_or(0);
            let (u, n) = match quote {
                Some(q) if b != 0 && b != q => decode_escaped(&rest[i..]),
                None if is_word_char(b) => decode_sanitized(&rest[i..]),
                _ => break,
            };
            i += n;
            if mode.is_safe() && !is_utf8_safe(u) {
                return Err(Error::Invalid);
            }
            out.push_raw(u)?;
        }
        match quote {
            Some(q) if rest.get(i) != Some(&q) => Err(Error::Invalid),
            _ => Ok(()),
        }
    }

    /// Compares the value at the cursor with `reference` as if the value were
    /// first decoded by [`Json::as_str`].
    ///
    /// Quoted strings compare by code point with escapes expanded; an
    /// unterminated string that runs out before `reference` does sorts
    /// first. Other values compare as bare words. The empty value, any
    /// structural byte and the word `null` sort before everything, including
    /// the empty reference.
    ///
    /// ```rust
    /// use core::cmp::Ordering;
    /// use jitjson::Json;
    ///
    /// assert_eq!(Json::from(r#""json""#).str_cmp("json"), Ordering::Equal);
    /// assert_eq!(Json::from(r#""jsoz""#).str_cmp("json"), Ordering::Greater);
    /// assert_eq!(Json::from("null").str_cmp(""), Ordering::Less);
    /// ```
    #[must_use]
    pub fn str_cmp(&self, reference: impl AsRef<[u8]>) -> Ordering {
        let reference = reference.as_ref();
        let s = self.value_scanner();
        match s.peek() {
            quote @ (b'"' | b'\'') => quoted_cmp(&s.rest()[1..], quote, reference),
            b if is_delimiter(b) => Ordering::Less,
            _ if s.word_cmp(NULL.as_bytes()).is_eq() => Ordering::Less,
            _ => s.word_cmp(reference),
        }
    }
}

/// `content` starts just after the opening `quote`.
fn quoted_cmp(content: &[u8], quote: u8, mut reference: &[u8]) -> Ordering {
    let mut i = 0;
    while !reference.is_empty() {
        if matches!(content.get(i), None | Some(&0)) || content[i] == quote {
            return Ordering::Less;
        }
        let Some((want, n)) = decode_raw(reference) else {
            return Ordering::Greater;
        };
        reference = &reference[n..];
        let (got, m) = decode_escaped(&content[i..]);
        i += m;
        match got.cmp(&want) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    match content.get(i) {
        None => Ordering::Less,
        Some(&b) if b == quote => Ordering::Equal,
        Some(_) => Ordering::Greater,
    }
}

/// Writes `src`, which must be well-formed UTF-8, as a quoted JSON string
/// followed by a NUL.
///
/// Control characters are escaped, and so are `</` and `]]>` so the result
/// can be embedded in HTML or XML. Returns the number of bytes used, NUL
/// included; pass an empty `dst` to learn the size.
///
/// ```rust
/// let mut buf = [0u8; 16];
/// let n = jitjson::string_from_str("a\"b", &mut buf).unwrap();
/// assert_eq!(&buf[..n], b"\"a\\\"b\"\0");
/// ```
///
/// # Errors
///
/// - [`Error::Invalid`] when `src` is malformed UTF-8 or holds a surrogate.
/// - [`Error::BufferTooSmall`] when `dst` is non-empty but too short.
pub fn string_from_str(src: impl AsRef<[u8]>, dst: &mut [u8]) -> Result<usize, Error> {
    string_from(src.as_ref(), StrMode::Safe, dst)
}

/// Like [`string_from_str`], but `src` is UTF-8B: the 3-byte encodings of
/// U+DC00..U+DCFF turn back into the single raw bytes they stand for.
///
/// # Errors
///
/// - [`Error::Invalid`] when `src` is malformed UTF-8.
/// - [`Error::BufferTooSmall`] when `dst` is non-empty but too short.
pub fn string_from_unsafe_str(src: impl AsRef<[u8]>, dst: &mut [u8]) -> Result<usize, Error> {
    string_from(src.as_ref(), StrMode::Unsafe, dst)
}

/// [`string_from_str`] into an owned [`String`], without the NUL.
///
/// # Errors
///
/// [`Error::Invalid`] when `src` is malformed UTF-8 or holds a surrogate.
pub fn to_json_string(src: impl AsRef<[u8]>) -> Result<String, Error> {
    let mut bytes = collect(|dst| string_from_str(src.as_ref(), dst))?;
    bytes.pop();
    String::from_utf8(bytes).map_err(|_| Error::Invalid)
}

/// [`string_from_unsafe_str`] into owned bytes, without the NUL.
///
/// # Errors
///
/// [`Error::Invalid`] when `src` is malformed UTF-8.
pub fn to_unsafe_json_string(src: impl AsRef<[u8]>) -> Result<BString, Error> {
    let mut bytes = collect(|dst| string_from_unsafe_str(src.as_ref(), dst))?;
    bytes.pop();
    Ok(BString::from(bytes))
}

fn string_from(src: &[u8], mode: StrMode, dst: &mut [u8]) -> Result<usize, Error> {
    let mut out = Sink::new(dst);
    match encode_string(src, mode, &mut out) {
        Ok(()) => out.finish(),
        Err(err) => Err(out.fail(err)),
    }
}

fn encode_string(mut src: &[u8], mode: StrMode, out: &mut Sink<'_>) -> Result<(), Error> {
    let mut behind: [Ucode; 2] = [0; 2];
    out.push(b'"');
    while !src.is_empty() {
        let (u, n) = decode_raw(src).ok_or(Error::Invalid)?;
        src = &src[n..];
        if mode.is_safe() && !is_utf8_safe(u) {
            return Err(Error::Invalid);
        }
        match (behind, u) {
            ([_, 0x3c], 0x2f) => out.extend(b"\\/"),
            ([0x5d, 0x5d], 0x3e) => out.extend(b"\\u003E"),
            _ => push_escaped(out, u)?,
        }
        behind = [behind[1], u];
    }
    out.push(b'"');
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use rstest::rstest;

    use super::*;

    fn decoded(text: &[u8], mode: StrMode) -> Result<Vec<u8>, Error> {
        let json = Json::new(text);
        let mut bytes = collect(|buf| json.as_str(mode, buf))?;
        bytes.pop();
        Ok(bytes)
    }

    fn encoded(src: &[u8], mode: StrMode) -> Result<Vec<u8>, Error> {
        let mut bytes = collect(|dst| string_from(src, mode, dst))?;
        bytes.pop();
        Ok(bytes)
    }

    #[rstest]
    #[case(b"\"hello\"", b"hello")]
    #[case(b"\"\"", b"")]
    #[case(b" \"\" ,", b"")]
    #[case(b"\t\n\r \"hi\"\r", b"hi")]
    #[case(b"'x'", b"x")]
    #[case(b"''", b"")]
    #[case(b"x", b"x")]
    #[case(b"\"\\u0061\"", b"a")]
    #[case(b"\"a\\u0001b\"", b"a\x01b")]
    #[case(b"\"\\u007F,\\u0080\"", b"\x7f,\xc2\x80")]
    #[case(b"\"\\u07ff,\\u0800\"", b"\xdf\xbf,\xe0\xa0\x80")]
    #[case(b"\"\\ufffff\"", b"\xef\xbf\xbff")]
    #[case(b"\"\\ud83c\\udc1c\"", b"\xf0\x9f\x80\x9c")]
    #[case(b"\"\xf0\x9f\x80\x9c\"", b"\xf0\x9f\x80\x9c")]
    #[case(b" null ", b"null")]
    #[case(b"'null'", b"null")]
    #[case(b"true'", b"true'")]
    #[case(b"a_b-c+d=e", b"a_b-c+d=e")]
    #[case(b"-1.8e+99 ", b"-1.8e+99")]
    #[case(b"-:", b"-")]
    #[case(b" can't ", b"can't")]
    #[case(b" a\\x ", b"a\\x")]
    #[case(b" a\\\" ", b"a\\")]
    #[case(b"\"\t\\t\"", b"\t\t")]
    #[case(b"\"\x08\\b\"", b"\x08\x08")]
    #[case(b"\"\\\"\"", b"\"")]
    #[case(b"\"/\\/\"", b"//")]
    #[case(b"\"\\\\\"", b"\\")]
    fn decodes_in_both_modes(#[case] text: &[u8], #[case] expected: &[u8]) {
        assert_eq!(decoded(text, StrMode::Safe).as_deref(), Ok(expected));
        assert_eq!(decoded(text, StrMode::Unsafe).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case(b"")]
    #[case(b" ")]
    #[case(b",\"ok\"")]
    #[case(b":\"ok\"")]
    #[case(b"[\"ok\"]")]
    #[case(b"{}")]
    #[case(b"\"")]
    #[case(b" \"'")]
    #[case(b" } \"ok\"")]
    #[case(b"\"\\u")]
    #[case(b"\"\\u000")]
    #[case(b"\"\\")]
    fn rejects_in_both_modes(#[case] text: &[u8]) {
        for mode in [StrMode::Safe, StrMode::Unsafe] {
            assert_eq!(decoded(text, mode), Err(Error::Invalid));
            let mut buf = [b'$'; 8];
            assert_eq!(Json::new(text).as_str(mode, &mut buf), Err(Error::Invalid));
            assert_eq!(buf[0], 0);
            let mut one = [b'#'];
            assert_eq!(Json::new(text).as_str(mode, &mut one), Err(Error::Invalid));
            assert_eq!(one[0], 0);
        }
    }

    #[rstest]
    #[case(b"\"\\u\"", b"\xed\xb1\x9cu")]
    #[case(b"\"\\u0000\"", b"\xed\xb0\x80")]
    #[case(b"\"a\\u0000b\"", b"a\xed\xb0\x80b")]
    #[case(b"\"\\udc00\"", b"\xed\xb1\x9cudc00")]
    #[case(b"\"\x80\x80\"", b"\xed\xb2\x80\xed\xb2\x80")]
    #[case(b"\"\xc0\x80\"", b"\xed\xb3\x80\xed\xb2\x80")]
    #[case(b"\"\xe1\xbf\"", b"\xed\xb3\xa1\xed\xb2\xbf")]
    #[case(b"\"\xf7\xbf\xbf\xbf\"", b"\xed\xb3\xb7\xed\xb2\xbf\xed\xb2\xbf\xed\xb2\xbf")]
    #[case(
        b"\"\\udc1c\\ud83c\"",
        b"\xed\xb1\x9cudc1c\xed\xb1\x9cud83c"
    )]
    fn dirty_input_needs_unsafe_mode(#[case] text: &[u8], #[case] expected: &[u8]) {
        assert_eq!(decoded(text, StrMode::Unsafe).as_deref(), Ok(expected));
        assert_eq!(decoded(text, StrMode::Safe), Err(Error::Invalid));
    }

    #[test]
    fn buffer_sizing() {
        let json = Json::from("\"hello\"");
        assert_eq!(json.as_str(StrMode::Safe, &mut []), Ok(6));

        let mut exact = [b'$'; 7];
        assert_eq!(json.as_str(StrMode::Safe, &mut exact[..6]), Ok(6));
        assert_eq!(&exact, b"hello\0$");

        let mut small = [b'$'; 2];
        assert_eq!(
            json.as_str(StrMode::Safe, &mut small[..1]),
            Err(Error::BufferTooSmall { needed: 6 })
        );
        assert_eq!(small, [0, b'$']);
    }

    #[test]
    fn owned_strings() {
        assert_eq!(Json::from("'it''s'").as_string().as_deref(), Ok("it"));
        assert_eq!(Json::from("\"\\u00e9\"").as_string().as_deref(), Ok("é"));
        assert_eq!(Json::from("\"\\x\"").as_string(), Err(Error::Invalid));
        assert_eq!(
            Json::from("\"\\x\"").as_unsafe_bytes(),
            Ok(BString::from(&b"\xed\xb1\x9cx"[..]))
        );
    }

    #[rstest]
    #[case("\"json\"", "json", Ordering::Equal)]
    #[case("\"jsoz\"", "json", Ordering::Greater)]
    #[case("\"json\"", "jsoz", Ordering::Less)]
    #[case("\"jsona\"", "json", Ordering::Greater)]
    #[case("\"json\"", "jsona", Ordering::Less)]
    #[case("\"\"", "", Ordering::Equal)]
    #[case("\"a\"", "", Ordering::Greater)]
    #[case("\"\"", "a", Ordering::Less)]
    #[case("true", "true", Ordering::Equal)]
    #[case("false", "true", Ordering::Less)]
    #[case("key:", "key", Ordering::Equal)]
    #[case("123", "123", Ordering::Equal)]
    #[case("nullx", "", Ordering::Greater)]
    #[case("nul", "", Ordering::Greater)]
    #[case("null", "", Ordering::Less)]
    #[case("{}", "", Ordering::Less)]
    #[case("[]", "", Ordering::Less)]
    #[case(",", "", Ordering::Less)]
    #[case("", "", Ordering::Less)]
    #[case("\"\\u0061\"", "a", Ordering::Equal)]
    #[case("\"\\\"\"", "\"", Ordering::Equal)]
    #[case("\"'\"", "'", Ordering::Equal)]
    #[case("'\"'", "\"", Ordering::Equal)]
    #[case("\"error", "", Ordering::Greater)]
    #[case("\"error", "error", Ordering::Less)]
    #[case("\"\\u0001\"", "\x01", Ordering::Equal)]
    #[case("\"\\u0080\"", "\u{80}", Ordering::Equal)]
    #[case("\"\\\\\\n\"", "\\\n", Ordering::Equal)]
    #[case("\"\\/\"", "/", Ordering::Equal)]
    #[case("\"\\f\"", "\x0c", Ordering::Equal)]
    #[case("\"a\\\"b\"", "a\"b", Ordering::Equal)]
    fn compares(#[case] text: &str, #[case] reference: &str, #[case] expected: Ordering) {
        assert_eq!(Json::from(text).str_cmp(reference), expected, "{text} vs {reference}");
    }

    #[test]
    fn compares_dirty_references() {
        let json = Json::from("\"\\u0000\"");
        assert_eq!(json.str_cmp(b"\xed\xb0\x80"), Ordering::Equal);
        assert_eq!(Json::from("\"a\"").str_cmp(b"\xff"), Ordering::Greater);
    }

    #[rstest]
    #[case(b"i", b"\"i\"")]
    #[case(b"", b"\"\"")]
    #[case(b"\t\r\n \x08/\"", b"\"\\t\\r\\n \\b/\\\"\"")]
    #[case(b"\0\x01\x1f", b"\"\\u0000\\u0001\\u001f\"")]
    #[case(b"\\", b"\"\\\\\"")]
    #[case(b"\xf0\x9f\x80\x9c", b"\"\xf0\x9f\x80\x9c\"")]
    #[case(b"</script>", b"\"<\\/script>\"")]
    #[case(b"a]]>b", b"\"a]]\\u003Eb\"")]
    #[case(b"]>]]]>", b"\"]>]]]\\u003E\"")]
    fn encodes_in_both_modes(#[case] src: &[u8], #[case] expected: &[u8]) {
        assert_eq!(encoded(src, StrMode::Safe).as_deref(), Ok(expected));
        assert_eq!(encoded(src, StrMode::Unsafe).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case(b"\xf0\x9f\x80")]
    #[case(b"\xf0")]
    #[case(b"\x80")]
    #[case(b"\xc0\x80")]
    fn rejects_malformed_sources(#[case] src: &[u8]) {
        assert_eq!(encoded(src, StrMode::Safe), Err(Error::Invalid));
        assert_eq!(encoded(src, StrMode::Unsafe), Err(Error::Invalid));
    }

    #[test]
    fn unwraps_dirty_bytes_only_when_unsafe() {
        assert_eq!(
            encoded(b"a\xed\xb1\x9cb", StrMode::Unsafe).as_deref(),
            Ok(&b"\"a\\b\""[..])
        );
        assert_eq!(encoded(b"\xed\xb1\x9c", StrMode::Safe), Err(Error::Invalid));
        assert_eq!(to_unsafe_json_string(b"\xed\xb2\xff"), Err(Error::Invalid));
    }

    #[test]
    fn encode_sizing() {
        assert_eq!(string_from_str("hello", &mut []), Ok(8));
        let mut one = [b'#'; 2];
        assert_eq!(
            string_from_str("hello", &mut one[..1]),
            Err(Error::BufferTooSmall { needed: 8 })
        );
        assert_eq!(one, [0, b'#']);
        assert_eq!(to_json_string("tab\there").as_deref(), Ok("\"tab\\there\""));
    }
}
