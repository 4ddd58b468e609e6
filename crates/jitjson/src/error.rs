use thiserror::Error;

/// Failure and imprecision signals shared by every conversion.
///
/// `Invalid` and `Range` are the soft signals: a best-effort value is still
/// produced (see [`Lossy`]). `BufferTooSmall` and `DepthExceeded` are the
/// resource errors and are never folded into a best-effort result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The text was not strictly the kind of value asked for.
    #[error("input is not a well-formed value of the requested kind")]
    Invalid,
    /// A number did not fit the target type and was clamped.
    #[error("number out of range for the target type")]
    Range,
    /// The output buffer could not hold the result.
    ///
    /// `needed` is the size, terminator included, that a retry must offer.
    /// The buffer's first byte has been set to 0 when it had one.
    #[error("output buffer too small, {needed} bytes needed")]
    BufferTooSmall {
        /// Bytes required for the complete output.
        needed: usize,
    },
    /// Arrays and objects were nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("nesting exceeds the depth limit")]
    DepthExceeded,
}

/// Why a selection path was rejected before or during the walk.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// The path is well formed but nothing in the document matches it.
    #[error("no value at path")]
    NotFound,
    /// The path text or its arguments are malformed.
    #[error("bad path at byte {at}: {reason}")]
    Syntax {
        /// Byte offset into the path text.
        at: usize,
        /// What was wrong there.
        reason: PathSyntax,
    },
    /// A container on the way was nested deeper than the scanner allows.
    #[error("nesting exceeds the depth limit")]
    Depth,
}

/// The specific defect of a rejected selection path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSyntax {
    /// `[` was not followed by digits, `%u` or `%d`.
    #[error("expected an index")]
    ExpectedIndex,
    /// A literal index was written with a minus sign.
    #[error("negative literal index")]
    NegativeIndex,
    /// An index was not closed by `]`.
    #[error("expected ']'")]
    ExpectedCloseBracket,
    /// A literal index does not fit in a `u32`.
    #[error("index too large")]
    IndexOverflow,
    /// A literal key contained `%` other than as `%%`.
    #[error("'%' is not allowed in a literal key")]
    PercentInKey,
    /// `.%s` was followed by something other than `.`, `[` or the end.
    #[error("unexpected character after %s")]
    TrailingAfterArgument,
    /// A later component did not start with `.` or `[`.
    #[error("expected '.' or '['")]
    ExpectedComponent,
    /// A placeholder had no positional argument left to consume.
    #[error("missing argument")]
    MissingArgument,
    /// A placeholder's argument had the wrong type.
    #[error("argument has the wrong type")]
    ArgumentType,
}

impl From<Error> for SelectError {
    fn from(err: Error) -> Self {
        match err {
            Error::DepthExceeded => SelectError::Depth,
            _ => SelectError::NotFound,
        }
    }
}

/// A best-effort conversion: always a value, sometimes with a complaint.
///
/// The scalar converters never refuse to answer. When the input was not a
/// strictly valid value of the requested kind they still return their best
/// guess, and record why it is only a guess in [`Lossy::error`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lossy<T> {
    value: T,
    error: Option<Error>,
}

impl<T> Lossy<T> {
    pub(crate) const fn exact(value: T) -> Self {
        Self { value, error: None }
    }

    pub(crate) const fn with(value: T, error: Error) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub(crate) const fn new(value: T, error: Option<Error>) -> Self {
        Self { value, error }
    }

    /// The converted value, whether or not it is exact.
    pub fn value(self) -> T {
        self.value
    }

    /// Why the value is approximate, if it is.
    pub const fn error(&self) -> Option<Error> {
        self.error
    }

    /// `true` when the input converted without any complaint.
    pub const fn is_exact(&self) -> bool {
        self.error.is_none()
    }

    /// Strict view: the value only if it converted exactly.
    ///
    /// # Errors
    ///
    /// Returns the recorded error when the conversion was approximate.
    pub fn into_result(self) -> Result<T, Error> {
        match self.error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }

    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Lossy<U> {
        Lossy {
            value: f(self.value),
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_into_result() {
        assert_eq!(Lossy::exact(3).into_result(), Ok(3));
        assert_eq!(Lossy::with(3, Error::Range).into_result(), Err(Error::Range));
        assert!(Lossy::new(false, None).is_exact());
    }

    #[test]
    fn depth_maps_to_select_depth() {
        assert_eq!(SelectError::from(Error::DepthExceeded), SelectError::Depth);
        assert_eq!(SelectError::from(Error::Invalid), SelectError::NotFound);
    }
}
