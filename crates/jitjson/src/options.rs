/// How string conversions treat bytes that are not valid UTF-8.
///
/// Text decoded from JSON may carry invalid bytes, either raw in the input or
/// produced by broken escapes. Each such byte travels as a code point in
/// `U+DC00..=U+DCFF`.
///
/// # Default
///
/// `Safe`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrMode {
    /// Output is strict UTF-8. Any invalid byte or surrogate makes the
    /// conversion fail with [`Error::Invalid`](crate::Error::Invalid).
    #[default]
    Safe,
    /// Output is UTF-8B. Decoding writes each invalid byte as the 3-byte
    /// encoding of its `U+DCxx` code point; encoding unwraps those back to
    /// the single original byte.
    Unsafe,
}

impl StrMode {
    pub(crate) const fn is_safe(self) -> bool {
        matches!(self, StrMode::Safe)
    }
}
