//! Binary data carried as base64 inside JSON strings.

use alloc::{string::String, vec::Vec};

use ::base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::{escape::hex_val, error::Error, json::Json, utf8::Sink};

/// Standard alphabet, padding required, stray low bits in the last symbol
/// ignored.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

impl Json<'_> {
    /// Decodes the base64 string at the cursor into `dst`.
    ///
    /// Whitespace between symbols is skipped, and the escapes `\n \t \r \f \/`
    /// and `\u00XX` are understood, so wrapped or escaped encodings decode.
    /// Returns the number of bytes decoded; nothing is appended. Pass an
    /// empty `dst` to learn that size.
    ///
    /// # Errors
    ///
    /// - [`Error::Invalid`] when the cursor is not on a quoted string, or the
    ///   string is not complete, correctly padded base64.
    /// - [`Error::BufferTooSmall`] when `dst` is non-empty but too short.
    pub fn as_base64(&self, dst: &mut [u8]) -> Result<usize, Error> {
        let mut out = Sink::new(dst);
        match self.as_bytes() {
            Ok(bytes) => {
                out.extend(&bytes);
                out.settle()
            }
            Err(err) => Err(out.fail(err)),
        }
    }

    /// Decodes the base64 string at the cursor into an owned buffer.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] as for [`Json::as_base64`].
    pub fn as_bytes(&self) -> Result<Vec<u8>, Error> {
        let symbols = self.base64_symbols()?;
        ENGINE.decode(symbols).map_err(|_| Error::Invalid)
    }

    /// The base64 symbols inside the quoted string, with whitespace dropped
    /// and escapes expanded.
    fn base64_symbols(&self) -> Result<Vec<u8>, Error> {
        let rest = self.value_scanner().rest();
        let Some(&quote @ (b'"' | b'\'')) = rest.first() else {
            return Err(Error::Invalid);
        };
        let mut symbols = Vec::with_capacity(rest.len());
        let mut i = 1;
        loop {
            let mut b = *rest.get(i).ok_or(Error::Invalid)?;
            i += 1;
            if b == quote {
                return Ok(symbols);
            }
            if b == b'\\' {
                let escape = *rest.get(i).ok_or(Error::Invalid)?;
                i += 1;
                b = match escape {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'f' => 0x0c,
                    b'/' => b'/',
                    b'u' => {
                        let byte = escaped_byte(rest.get(i..i + 4)).ok_or(Error::Invalid)?;
                        i += 4;
                        byte
                    }
                    _ => return Err(Error::Invalid),
                };
            }
            if !matches!(b, b' ' | b'\t' | b'\n' | 0x0c | b'\r') {
                symbols.push(b);
            }
        }
    }
}

/// `00XX` after `\u`, limited to a single byte.
fn escaped_byte(hex: Option<&[u8]>) -> Option<u8> {
    let &[b'0', b'0', hi, lo] = hex? else {
        return None;
    };
    let value = hex_val(hi)? << 4 | hex_val(lo)?;
    u8::try_from(value).ok()
}

/// Writes `src` as a quoted base64 JSON string, followed by a NUL.
///
/// Returns the number of bytes used, NUL included; pass an empty `dst` to
/// learn that size.
///
/// ```rust
/// let mut buf = [0u8; 16];
/// let n = jitjson::base64_from_bytes(b"hello", &mut buf).unwrap();
/// assert_eq!(&buf[..n], b"\"aGVsbG8=\"\0");
/// ```
///
/// # Errors
///
/// [`Error::BufferTooSmall`] when `dst` is non-empty but too short.
pub fn base64_from_bytes(src: impl AsRef<[u8]>, dst: &mut [u8]) -> Result<usize, Error> {
    let mut out = Sink::new(dst);
    out.push(b'"');
    out.extend(ENGINE.encode(src).as_bytes());
    out.push(b'"');
    out.finish()
}

/// `src` as a quoted base64 JSON string.
#[must_use]
pub fn to_base64_string(src: impl AsRef<[u8]>) -> String {
    let mut json = String::from("\"");
    ENGINE.encode_string(src, &mut json);
    json.push('"');
    json
}
