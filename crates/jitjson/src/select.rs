//! Selection paths.
//!
//! A path is a sequence of components:
//!
//! - `.key` matches an object member by key. `%%` in a literal key stands
//!   for `%`; an empty key matches the member named `""`.
//! - `.%s` takes the key from the next [`PathArg`].
//! - `[7]`, `[%u]`, `[%d]` pick an array element by position.
//!
//! The first component may leave out its `.`. Components are applied in
//! order by walking the document with the container iterators, so nothing is
//! copied. The whole path is checked even after a component fails to match,
//! which makes a malformed path an error no matter what document it meets.

use alloc::{borrow::Cow, string::String, vec::Vec};

use log::{debug, trace};

use crate::{
    error::{Error, PathSyntax, SelectError},
    json::Json,
    path::PathArg,
};

/// One parsed component.
#[derive(Debug, PartialEq)]
enum Step<'p> {
    Key(Cow<'p, [u8]>),
    /// `None` for a negative index argument, which matches nothing.
    Index(Option<u32>),
}

/// Splits a path into steps, taking arguments as placeholders appear.
struct PathReader<'p, 'x> {
    path: &'p [u8],
    pos: usize,
    args: core::slice::Iter<'x, PathArg<'p>>,
}

impl<'p, 'x> PathReader<'p, 'x> {
    fn new(path: &'p str, args: &'x [PathArg<'p>]) -> Self {
        Self {
            path: path.as_bytes(),
            pos: 0,
            args: args.iter(),
        }
    }

    fn byte(&self, ahead: usize) -> u8 {
        self.path.get(self.pos + ahead).copied().unwrap_or(0)
    }

    /// At the end of the path or at the start of the next component.
    fn at_boundary(&self) -> bool {
        self.pos >= self.path.len() || matches!(self.byte(0), b'[' | b'.')
    }

    fn placeholder(&self, kind: u8) -> bool {
        self.byte(0) == b'%' && self.byte(1) == kind
    }

    fn syntax(&self, at: usize, reason: PathSyntax) -> SelectError {
        debug!("rejecting selection path at byte {at}: {reason}");
        SelectError::Syntax { at, reason }
    }

    fn arg(&mut self, at: usize) -> Result<PathArg<'p>, SelectError> {
        self.args
            .next()
            .copied()
            .ok_or_else(|| self.syntax(at, PathSyntax::MissingArgument))
    }

    fn next_step(&mut self) -> Result<Option<Step<'p>>, SelectError> {
        if self.pos >= self.path.len() {
            return Ok(None);
        }
        let step = match self.byte(0) {
            b'[' => {
                self.pos += 1;
                self.index()?
            }
            b'.' => {
                self.pos += 1;
                self.key()?
            }
            _ if self.pos == 0 => self.key()?,
            _ => return Err(self.syntax(self.pos, PathSyntax::ExpectedComponent)),
        };
        Ok(Some(step))
    }

    /// The part of `[...]` after the bracket.
    fn index(&mut self) -> Result<Step<'p>, SelectError> {
        let at = self.pos;
        let index = if self.placeholder(b'd') {
            self.pos += 2;
            match self.arg(at)? {
                PathArg::Int(i) => u32::try_from(i).ok(),
                PathArg::UInt(u) => Some(u),
                PathArg::Str(_) => return Err(self.syntax(at, PathSyntax::ArgumentType)),
            }
        } else if self.placeholder(b'u') {
            self.pos += 2;
            match self.arg(at)? {
                PathArg::UInt(u) => Some(u),
                PathArg::Int(i) if i >= 0 => u32::try_from(i).ok(),
                _ => return Err(self.syntax(at, PathSyntax::ArgumentType)),
            }
        } else {
            Some(self.literal_index()?)
        };
        if self.byte(0) != b']' {
            return Err(self.syntax(self.pos, PathSyntax::ExpectedCloseBracket));
        }
        self.pos += 1;
        Ok(Step::Index(index))
    }

    fn literal_index(&mut self) -> Result<u32, SelectError> {
        let at = self.pos;
        match self.byte(0) {
            b'-' => return Err(self.syntax(at, PathSyntax::NegativeIndex)),
            b'0'..=b'9' => {}
            _ => return Err(self.syntax(at, PathSyntax::ExpectedIndex)),
        }
        let mut index: u32 = 0;
        while let digit @ b'0'..=b'9' = self.byte(0) {
            index = index
                .checked_mul(10)
                .and_then(|i| i.checked_add(u32::from(digit - b'0')))
                .ok_or_else(|| self.syntax(at, PathSyntax::IndexOverflow))?;
            self.pos += 1;
        }
        Ok(index)
    }

    /// The part of `.key` after the dot.
    fn key(&mut self) -> Result<Step<'p>, SelectError> {
        let at = self.pos;
        if self.placeholder(b's') {
            self.pos += 2;
            if !self.at_boundary() {
                return Err(self.syntax(self.pos, PathSyntax::TrailingAfterArgument));
            }
            return match self.arg(at)? {
                PathArg::Str(key) => Ok(Step::Key(Cow::Borrowed(key.as_bytes()))),
                _ => Err(self.syntax(at, PathSyntax::ArgumentType)),
            };
        }

        let mut unescaped: Option<Vec<u8>> = None;
        while !self.at_boundary() {
            if self.byte(0) == b'%' {
                if self.byte(1) != b'%' {
                    return Err(self.syntax(self.pos, PathSyntax::PercentInKey));
                }
                unescaped
                    .get_or_insert_with(|| self.path[at..self.pos].to_vec())
                    .push(b'%');
                self.pos += 2;
                continue;
            }
            if let Some(key) = unescaped.as_mut() {
                key.push(self.byte(0));
            }
            self.pos += 1;
        }
        Ok(Step::Key(match unescaped {
            Some(key) => Cow::Owned(key),
            None => Cow::Borrowed(&self.path[at..self.pos]),
        }))
    }
}

impl<'a> Json<'a> {
    /// Walks `path` from the value at the cursor.
    ///
    /// Placeholders in `path` take their values from `args` in order; the
    /// [`select!`](crate::select!) macro builds both from one argument list.
    /// An empty path selects the cursor itself.
    ///
    /// ```rust
    /// use jitjson::{Json, PathArg};
    ///
    /// let doc = Json::from(r#"{"a": [1, 2, 3]}"#);
    /// let two = doc.select(".a[1]", &[]).unwrap();
    /// assert_eq!(two.raw(), Some(&b"2"[..]));
    ///
    /// let three = doc.select("%s[%u]", &[PathArg::Str("a"), PathArg::UInt(2)]).unwrap();
    /// assert_eq!(three.as_int().into_result(), Ok(3));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`SelectError::Syntax`] when the path or its arguments are malformed,
    ///   whatever the document holds.
    /// - [`SelectError::NotFound`] when a component names a missing member,
    ///   an index past the end, a negative `%d` index, or meets a value that
    ///   is not the right kind of container.
    /// - [`SelectError::Depth`] when a container on the way nests too deeply
    ///   to be walked.
    pub fn select(&self, path: &str, args: &[PathArg<'_>]) -> Result<Json<'a>, SelectError> {
        let mut reader = PathReader::new(path, args);
        let mut current = Some(*self);
        while let Some(step) = reader.next_step()? {
            let Some(json) = current else {
                continue;
            };
            trace!("select {step:?} at offset {}", json.offset());
            current = match step {
                Step::Key(key) => json.member(&key)?,
                Step::Index(Some(index)) => json.element(index)?,
                Step::Index(None) => None,
            };
        }
        current.ok_or(SelectError::NotFound)
    }

    fn member(&self, key: &[u8]) -> Result<Option<Json<'a>>, SelectError> {
        let Ok(mut members) = self.begin_object() else {
            return Ok(None);
        };
        let found = members.find(|(k, _)| k.str_cmp(key).is_eq());
        match (found, members.error()) {
            (None, Some(err)) => Err(err.into()),
            (found, _) => Ok(found.map(|(_, value)| value)),
        }
    }

    fn element(&self, index: u32) -> Result<Option<Json<'a>>, SelectError> {
        let Ok(mut elements) = self.begin_array() else {
            return Ok(None);
        };
        let found = elements.nth(index as usize);
        match (found, elements.error()) {
            (None, Some(err)) => Err(err.into()),
            (found, _) => Ok(found),
        }
    }

    /// Selects `path` and converts it with [`Json::as_bool`], or returns
    /// `default` when the path does not resolve.
    #[must_use]
    pub fn select_bool_or(&self, default: bool, path: &str, args: &[PathArg<'_>]) -> bool {
        self.select(path, args)
            .map_or(default, |v| v.as_bool().value())
    }

    /// Selects `path` and converts it with [`Json::as_int`], or returns
    /// `default` when the path does not resolve.
    #[must_use]
    pub fn select_int_or(&self, default: i32, path: &str, args: &[PathArg<'_>]) -> i32 {
        self.select(path, args)
            .map_or(default, |v| v.as_int().value())
    }

    /// Selects `path` and converts it with [`Json::as_long`], or returns
    /// `default` when the path does not resolve.
    #[must_use]
    pub fn select_long_or(&self, default: i64, path: &str, args: &[PathArg<'_>]) -> i64 {
        self.select(path, args)
            .map_or(default, |v| v.as_long().value())
    }

    /// Selects `path` and converts it with [`Json::as_double`], or returns
    /// `default` when the path does not resolve.
    #[must_use]
    pub fn select_double_or(&self, default: f64, path: &str, args: &[PathArg<'_>]) -> f64 {
        self.select(path, args)
            .map_or(default, |v| v.as_double().value())
    }

    /// Selects `path` and converts it with [`Json::as_string`], or returns
    /// `default` when the path does not resolve.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] when the selected value has no strict UTF-8 string
    /// form.
    pub fn select_string_or(
        &self,
        default: &str,
        path: &str,
        args: &[PathArg<'_>],
    ) -> Result<String, Error> {
        match self.select(path, args) {
            Ok(v) => v.as_string(),
            Err(_) => Ok(String::from(default)),
        }
    }
}
