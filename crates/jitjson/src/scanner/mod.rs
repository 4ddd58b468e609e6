//! Scanner: byte-level lexing over a borrowed JSON text.
//!
//! Why this exists
//! - Every operation in the crate works directly on the original text. They
//!   all need to agree on what whitespace, delimiters and words are, and on
//!   where one value ends. This module is that single source of truth.
//!
//! What it does
//! - Classifies bytes: whitespace is `SP HT LF CR`; delimiters are control
//!   bytes, space and `[ ] { } : , " '`; a word is a maximal run of
//!   non-delimiters, with `'` also allowed after the first byte.
//! - Skips one word or quoted string, honoring `\` inside quotes without
//!   validating the escape.
//! - Skips one whole value, including nested arrays and objects, using a
//!   fixed-size bit stack instead of recursion.
//!
//! Invariants
//! - The text holds no NUL byte. `peek()` returns 0 at the end, so 0 is the
//!   end sentinel everywhere.
//! - The position never moves past the end of the text.
//! - A skip either advances or leaves the position untouched.
//! - Nesting is limited to [`MAX_DEPTH`] open brackets. Going deeper is an
//!   error and the position is restored.

use core::cmp::Ordering;

use log::{debug, trace};

use crate::error::Error;

/// Deepest nesting of arrays and objects that a skip will follow.
pub const MAX_DEPTH: usize = 32768;

const WORD_BITS: usize = u64::BITS as usize;

/// JSON insignificant whitespace.
#[inline]
pub(crate) const fn is_white(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that end a bare word.
#[inline]
pub(crate) const fn is_delimiter(b: u8) -> bool {
    b <= b' ' || matches!(b, b'[' | b']' | b'{' | b'}' | b':' | b',' | b'"' | b'\'')
}

#[inline]
pub(crate) const fn is_word_start(b: u8) -> bool {
    !is_delimiter(b)
}

#[inline]
pub(crate) const fn is_word_char(b: u8) -> bool {
    b == b'\'' || is_word_start(b)
}

/// Which kind of bracket each open nesting level came from, one bit per
/// level (1 for `[`, 0 for `{`).
struct NestStack {
    bits: [u64; MAX_DEPTH / WORD_BITS],
    depth: usize,
}

impl NestStack {
    const fn new() -> Self {
        Self {
            bits: [0; MAX_DEPTH / WORD_BITS],
            depth: 0,
        }
    }

    const fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Returns `false` when the stack is full.
    fn push(&mut self, is_array: bool) -> bool {
        if self.depth == MAX_DEPTH {
            return false;
        }
        let (word, bit) = (self.depth / WORD_BITS, self.depth % WORD_BITS);
        if is_array {
            self.bits[word] |= 1 << bit;
        } else {
            self.bits[word] &= !(1 << bit);
        }
        self.depth += 1;
        true
    }

    /// `Some(true)` inside an array, `Some(false)` inside an object.
    fn top(&self) -> Option<bool> {
        let d = self.depth.checked_sub(1)?;
        Some(self.bits[d / WORD_BITS] >> (d % WORD_BITS) & 1 == 1)
    }

    fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// A position in a NUL-free text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(text: &'a [u8], pos: usize) -> Self {
        Self { text, pos }
    }

    pub(crate) const fn pos(&self) -> usize {
        self.pos
    }

    /// The unread remainder of the text.
    pub(crate) fn rest(&self) -> &'a [u8] {
        self.text.get(self.pos..).unwrap_or_default()
    }

    #[inline]
    pub(crate) fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    #[inline]
    pub(crate) fn peek_at(&self, ahead: usize) -> u8 {
        self.text.get(self.pos + ahead).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        if self.pos < self.text.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn skip_white(&mut self) {
        while is_white(self.peek()) {
            self.pos += 1;
        }
    }

    /// Consumes `delim` and the whitespace after it, if `delim` is next.
    pub(crate) fn skip_delim(&mut self, delim: u8) -> bool {
        if delim == 0 || self.peek() != delim {
            return false;
        }
        self.pos += 1;
        self.skip_white();
        true
    }

    /// Skips a bare word or a quoted string, then trailing whitespace.
    ///
    /// Structural bytes (`[ ] { } : ,`) are never skipped. An unterminated
    /// string runs to the end of the text.
    pub(crate) fn skip_word_or_string(&mut self) -> bool {
        match self.peek() {
            quote @ (b'"' | b'\'') => {
                self.pos += 1;
                loop {
                    match self.peek() {
                        0 => break,
                        b if b == quote => {
                            self.pos += 1;
                            break;
                        }
                        b'\\' => {
                            self.bump();
                            self.bump();
                        }
                        _ => self.pos += 1,
                    }
                }
            }
            b if is_word_start(b) => {
                self.pos += 1;
                while is_word_char(self.peek()) {
                    self.pos += 1;
                }
            }
            _ => return false,
        }
        self.skip_white();
        true
    }

    /// Skips exactly one value and its trailing whitespace.
    ///
    /// The position must not be on whitespace. Returns whether anything was
    /// skipped. A closer that does not match the innermost opener ends the
    /// walk there, as does any byte that no rule consumes (a stray `:` or a
    /// control byte). Truncated containers end at the end of the text.
    ///
    /// # Errors
    ///
    /// [`Error::DepthExceeded`] when brackets nest deeper than [`MAX_DEPTH`].
    /// The position is left where it was.
    pub(crate) fn skip_value(&mut self) -> Result<bool, Error> {
        let start = self.pos;
        let mut nest = NestStack::new();

        'walk: while self.peek() != 0 {
            let round = self.pos;

            while let close @ (b']' | b'}') = self.peek() {
                match nest.top() {
                    Some(is_array) if is_array == (close == b']') => {}
                    _ => break 'walk,
                }
                self.pos += 1;
                self.skip_white();
                nest.pop();
                if nest.is_empty() {
                    break 'walk;
                }
            }

            if nest.top() == Some(false) {
                self.skip_word_or_string();
                self.skip_delim(b':');
            }

            match self.peek() {
                open @ (b'[' | b'{') => {
                    if !nest.push(open == b'[') {
                        debug!("nesting deeper than {MAX_DEPTH} at offset {}", self.pos);
                        self.pos = start;
                        return Err(Error::DepthExceeded);
                    }
                    self.pos += 1;
                    self.skip_white();
                }
                _ => {
                    self.skip_word_or_string();
                    if nest.is_empty() {
                        break;
                    }
                }
            }

            self.skip_delim(b',');

            if self.pos == round {
                trace!("skip stalled on {:#04x} at offset {}", self.peek(), self.pos);
                break;
            }
        }

        Ok(self.pos != start)
    }

    /// The bare word at the position, or an empty slice if none starts here.
    pub(crate) fn word(&self) -> &'a [u8] {
        let rest = self.rest();
        match rest.first() {
            Some(&b) if is_word_start(b) => {
                let len = rest[1..]
                    .iter()
                    .position(|&b| !is_word_char(b))
                    .map_or(rest.len(), |n| n + 1);
                &rest[..len]
            }
            _ => &[],
        }
    }

    /// Compares the bare word at the position with `reference`, bytewise.
    ///
    /// A position that does not start a word compares like an empty word:
    /// equal to an empty reference and less than anything else.
    pub(crate) fn word_cmp(&self, reference: &[u8]) -> Ordering {
        self.word().cmp(reference)
    }
}

#[cfg(test)]
mod tests;
