/// A positional argument for a `%s`, `%u` or `%d` placeholder in a selection
/// path.
///
/// Arguments are consumed left to right, one per placeholder. The
/// [`select!`](crate::select!) macro builds the argument list with these
/// conversions, so callers rarely name the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathArg<'p> {
    /// A key for `.%s`.
    Str(&'p str),
    /// An index for `[%u]` or `[%d]`.
    UInt(u32),
    /// An index for `[%d]`, or for `[%u]` when not negative. A negative
    /// `[%d]` index matches nothing.
    Int(i32),
}

impl<'p> From<&'p str> for PathArg<'p> {
    fn from(key: &'p str) -> Self {
        PathArg::Str(key)
    }
}

impl<'p> From<&'p alloc::string::String> for PathArg<'p> {
    fn from(key: &'p alloc::string::String) -> Self {
        PathArg::Str(key)
    }
}

// Only lossless conversions, so `select!(doc, "[%d]", n)` never wraps.
macro_rules! impl_from_int_for_path_arg {
    ($variant:ident: $($t:ty),+) => {
        $(
            impl From<$t> for PathArg<'_> {
                fn from(i: $t) -> Self {
                    PathArg::$variant(i.into())
                }
            }
        )+
    };
}

impl_from_int_for_path_arg!(UInt: u8, u16, u32);
impl_from_int_for_path_arg!(Int: i8, i16, i32);
