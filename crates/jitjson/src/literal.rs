//! The bare words `true`, `false` and `null`.

use crate::{
    error::{Error, Lossy},
    json::Json,
    number::read_double,
    scanner::is_delimiter,
};

/// The text of JSON `true`.
pub const TRUE: &str = "true";
/// The text of JSON `false`.
pub const FALSE: &str = "false";
/// The text of JSON `null`.
pub const NULL: &str = "null";

impl Json<'_> {
    /// Converts the value at the cursor to a boolean.
    ///
    /// Only the words `true` and `false` convert exactly. Anything else is
    /// flagged [`Error::Invalid`] and judged by JavaScript-like truthiness:
    /// containers are true; empty strings, zero, `NaN`, `null`, `undefined`
    /// and the empty value are false; everything else is true.
    ///
    /// ```rust
    /// use jitjson::{Error, Json};
    ///
    /// assert_eq!(Json::from("true").as_bool().into_result(), Ok(true));
    /// let zero = Json::from("0").as_bool();
    /// assert!(!zero.value());
    /// assert_eq!(zero.error(), Some(Error::Invalid));
    /// ```
    #[must_use]
    pub fn as_bool(&self) -> Lossy<bool> {
        let s = self.value_scanner();
        if s.word_cmp(FALSE.as_bytes()).is_eq() {
            return Lossy::exact(false);
        }
        if s.word_cmp(TRUE.as_bytes()).is_eq() {
            return Lossy::exact(true);
        }
        Lossy::with(truthy(self), Error::Invalid)
    }

    /// Whether the value at the cursor is the bare word `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value_scanner().word_cmp(NULL.as_bytes()).is_eq()
    }
}

fn truthy(json: &Json<'_>) -> bool {
    let s = json.value_scanner();
    match s.peek() {
        b'[' | b'{' => return true,
        quote @ (b'"' | b'\'') => return s.peek_at(1) != quote,
        b if is_delimiter(b) => return false,
        b'+' | b'-' | b'0' | b'.' | b'N' => {
            let rest = s.rest();
            if let Some(p) = read_double(rest) {
                if is_delimiter(rest.get(p.len).copied().unwrap_or(0)) {
                    return !(p.value == 0.0 || p.value.is_nan());
                }
            }
        }
        _ => {}
    }
    let word = s.word();
    !(word == NULL.as_bytes() || word == b"undefined")
}
