use core::fmt;

use bstr::ByteSlice;

use crate::{
    error::Error,
    scanner::{Scanner, is_white},
};

/// A cursor at one value inside borrowed JSON text.
///
/// The text is never parsed into a tree. Each accessor sniffs and scans the
/// bytes at the cursor when it is called. Cursors are `Copy` and borrow the
/// text, so the text cannot change while any cursor into it exists.
///
/// The text ends at its first NUL byte or at the end of the slice, whichever
/// comes first. The [`Default`] cursor is the absent text, which behaves like
/// an empty value.
///
/// ```rust
/// use jitjson::{Json, ValueType};
///
/// let doc = Json::from(r#" {"a": [1, 2, 3]} "#);
/// assert_eq!(doc.value_type(), ValueType::Object);
/// assert_eq!(doc.span(), Some(17));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<'a> {
    text: &'a [u8],
    pos: usize,
}

/// The kind of value at a cursor, judged from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// Anything that cannot start a value, including the end of the text.
    Bad,
    /// `{`
    Object,
    /// `[`
    Array,
    /// `t` or `f`
    Bool,
    /// `n`
    Null,
    /// `-` or a digit
    Number,
    /// `"`
    String,
}

impl<'a> Json<'a> {
    /// A cursor at the start of `text`, which ends at its first NUL if any.
    #[must_use]
    pub fn new(text: &'a [u8]) -> Self {
        let end = text.find_byte(0).unwrap_or(text.len());
        Self {
            text: &text[..end],
            pos: 0,
        }
    }

    pub(crate) const fn at(text: &'a [u8], pos: usize) -> Self {
        Self { text, pos }
    }

    /// Byte offset of the cursor from the start of the text.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// The whole text this cursor points into.
    #[must_use]
    pub const fn text(&self) -> &'a [u8] {
        self.text
    }

    /// The text from the cursor to the end.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.scanner().rest()
    }

    pub(crate) const fn scanner(&self) -> Scanner<'a> {
        Scanner::new(self.text, self.pos)
    }

    /// A scanner on the first byte of the value, past leading whitespace.
    pub(crate) fn value_scanner(&self) -> Scanner<'a> {
        let mut s = self.scanner();
        s.skip_white();
        s
    }

    /// Classifies the value at the cursor.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self.value_scanner().peek() {
            b'{' => ValueType::Object,
            b'[' => ValueType::Array,
            b't' | b'f' => ValueType::Bool,
            b'n' => ValueType::Null,
            b'"' => ValueType::String,
            b'-' | b'0'..=b'9' => ValueType::Number,
            _ => ValueType::Bad,
        }
    }

    /// Byte length of the value at the cursor, counting leading whitespace
    /// but not trailing whitespace.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] when no value starts here.
    /// [`Error::DepthExceeded`] when the value nests too deeply to measure.
    pub fn try_span(&self) -> Result<usize, Error> {
        let (_, end) = self.bounds()?;
        Ok(end - self.pos)
    }

    /// Byte length of the value at the cursor, like [`Json::try_span`], or
    /// `None` when it cannot be measured.
    #[must_use]
    pub fn span(&self) -> Option<usize> {
        self.try_span().ok()
    }

    /// The bytes of the value at the cursor, without surrounding whitespace.
    #[must_use]
    pub fn raw(&self) -> Option<&'a [u8]> {
        let (start, end) = self.bounds().ok()?;
        self.text.get(start..end)
    }

    /// Start (after leading whitespace) and end (before trailing whitespace)
    /// of the value at the cursor.
    fn bounds(&self) -> Result<(usize, usize), Error> {
        let mut s = self.value_scanner();
        let start = s.pos();
        if !s.skip_value()? {
            return Err(Error::Invalid);
        }
        let trailing = self.text[start..s.pos()]
            .iter()
            .rev()
            .take_while(|&&b| is_white(b))
            .count();
        Ok((start, s.pos() - trailing))
    }
}

impl<'a> From<&'a [u8]> for Json<'a> {
    fn from(text: &'a [u8]) -> Self {
        Json::new(text)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Json<'a> {
    fn from(text: &'a [u8; N]) -> Self {
        Json::new(text)
    }
}

impl<'a> From<&'a str> for Json<'a> {
    fn from(text: &'a str) -> Self {
        Json::new(text.as_bytes())
    }
}

impl fmt::Debug for Json<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Json")
            .field("offset", &self.pos)
            .field("rest", &self.rest().as_bstr())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("{}", ValueType::Object)]
    #[case(" [1]", ValueType::Array)]
    #[case("true", ValueType::Bool)]
    #[case("f", ValueType::Bool)]
    #[case("null", ValueType::Null)]
    #[case("\"s\"", ValueType::String)]
    #[case("-1", ValueType::Number)]
    #[case("7", ValueType::Number)]
    #[case("+1", ValueType::Bad)]
    #[case(".5", ValueType::Bad)]
    #[case("'s'", ValueType::Bad)]
    #[case("", ValueType::Bad)]
    #[case(",", ValueType::Bad)]
    fn sniffs_type(#[case] text: &str, #[case] expected: ValueType) {
        assert_eq!(Json::from(text).value_type(), expected);
    }

    #[rstest]
    #[case("0", Some(1))]
    #[case("0:", Some(1))]
    #[case("0 ,", Some(1))]
    #[case(" 0,", Some(2))]
    #[case(" 0 ,", Some(2))]
    #[case("1,2 ", Some(1))]
    #[case("[[[[ ]]]],null", Some(9))]
    #[case(" null ,", Some(5))]
    #[case("foo bar", Some(3))]
    #[case(" \"foo\\\"bar\",", Some(11))]
    #[case("", None)]
    #[case("   ", None)]
    #[case(",", None)]
    fn spans(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(Json::from(text).span(), expected);
    }

    #[test]
    fn nul_ends_the_text() {
        let doc = Json::new(b"[1]\0[2,3]");
        assert_eq!(doc.text(), b"[1]");
        assert_eq!(doc.span(), Some(3));
        assert_eq!(Json::default().span(), None);
        assert_eq!(Json::default().value_type(), ValueType::Bad);
    }

    #[test]
    fn raw_excludes_whitespace() {
        let doc = Json::from("  {\"a\" : 1 }  ,");
        assert_eq!(doc.raw(), Some(&b"{\"a\" : 1 }"[..]));
        assert_eq!(doc.try_span(), Ok(12));
    }

    #[test]
    fn span_reports_depth() {
        let deep = alloc::vec![b'['; crate::MAX_DEPTH + 1];
        assert_eq!(Json::new(&deep).try_span(), Err(Error::DepthExceeded));
        assert_eq!(Json::new(&deep).span(), None);
    }
}
