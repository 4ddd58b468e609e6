//! Iteration over the members of arrays and objects.
//!
//! Both iterators hold only a position. Each step skips one element with the
//! scanner, so walking a container never copies or allocates. The grammar is
//! forgiving: a missing comma, a trailing comma or a bare `,` still yields
//! something sensible, and a step that cannot advance ends the iteration for
//! good.

use core::iter::FusedIterator;

use log::trace;

use crate::{error::Error, json::Json, scanner::Scanner};

/// Iterator over the elements of a JSON array.
///
/// Created by [`Json::begin_array`].
#[derive(Debug, Clone)]
pub struct ArrayIter<'a> {
    text: &'a [u8],
    pos: Option<usize>,
    error: Option<Error>,
}

/// Iterator over the `(key, value)` members of a JSON object.
///
/// Created by [`Json::begin_object`]. Keys are cursors too; compare them with
/// [`Json::str_cmp`] or convert them with [`Json::as_string`].
#[derive(Debug, Clone)]
pub struct ObjectIter<'a> {
    text: &'a [u8],
    pos: Option<usize>,
    error: Option<Error>,
}

impl<'a> Json<'a> {
    /// Starts iterating the array at the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] if the value at the cursor does not start with `[`.
    pub fn begin_array(&self) -> Result<ArrayIter<'a>, Error> {
        let pos = self.open(b'[')?;
        Ok(ArrayIter {
            text: self.text(),
            pos: Some(pos),
            error: None,
        })
    }

    /// Starts iterating the object at the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] if the value at the cursor does not start with `{`.
    pub fn begin_object(&self) -> Result<ObjectIter<'a>, Error> {
        let pos = self.open(b'{')?;
        Ok(ObjectIter {
            text: self.text(),
            pos: Some(pos),
            error: None,
        })
    }

    fn open(&self, bracket: u8) -> Result<usize, Error> {
        let mut s = self.value_scanner();
        if s.skip_delim(bracket) {
            Ok(s.pos())
        } else {
            Err(Error::Invalid)
        }
    }
}

/// Skips one value, folding a depth failure into "did not advance".
fn skip_recording(s: &mut Scanner<'_>, error: &mut Option<Error>) -> bool {
    s.skip_value().unwrap_or_else(|err| {
        *error = Some(err);
        false
    })
}

/// The stored position, unless the iterator is done or sits on `closer`.
fn live_position(text: &[u8], pos: &mut Option<usize>, closer: u8) -> Option<usize> {
    let at = (*pos)?;
    let b = Scanner::new(text, at).peek();
    if b == closer || b == 0 {
        trace!("iterator exhausted at offset {at}");
        *pos = None;
        return None;
    }
    Some(at)
}

impl ArrayIter<'_> {
    /// Nesting inside an element went past the depth limit.
    ///
    /// Iteration stops after such an element, since its end is unknown.
    #[must_use]
    pub const fn error(&self) -> Option<Error> {
        self.error
    }
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Json<'a>;

    fn next(&mut self) -> Option<Json<'a>> {
        let at = live_position(self.text, &mut self.pos, b']')?;
        let mut s = Scanner::new(self.text, at);
        let advanced = skip_recording(&mut s, &mut self.error) | s.skip_delim(b',');
        self.pos = advanced.then_some(s.pos());
        Some(Json::at(self.text, at))
    }
}

impl FusedIterator for ArrayIter<'_> {}

impl ObjectIter<'_> {
    /// Nesting inside a member went past the depth limit.
    #[must_use]
    pub const fn error(&self) -> Option<Error> {
        self.error
    }
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (Json<'a>, Json<'a>);

    fn next(&mut self) -> Option<(Json<'a>, Json<'a>)> {
        let at = live_position(self.text, &mut self.pos, b'}')?;
        let mut s = Scanner::new(self.text, at);
        let mut advanced = skip_recording(&mut s, &mut self.error);
        advanced |= s.skip_delim(b':');
        let value = s.pos();
        advanced |= skip_recording(&mut s, &mut self.error);
        advanced |= s.skip_delim(b',');
        self.pos = advanced.then_some(s.pos());
        Some((Json::at(self.text, at), Json::at(self.text, value)))
    }
}

impl FusedIterator for ObjectIter<'_> {}
