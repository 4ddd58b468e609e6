use alloc::vec::Vec;
use std::time::Duration;

use rstest::rstest;

use super::*;

fn skipped(text: &str) -> (Result<bool, Error>, usize) {
    let mut s = Scanner::new(text.as_bytes(), 0);
    let r = s.skip_value();
    (r, s.pos())
}

#[test]
fn classification() {
    for b in [b' ', b'\t', b'\n', b'\r'] {
        assert!(is_white(b));
        assert!(is_delimiter(b));
    }
    for b in *b"[]{}:,\"'\x00\x01\x1f" {
        assert!(is_delimiter(b), "{b:#x}");
    }
    assert!(!is_white(0x0b));
    assert!(is_word_start(b'a'));
    assert!(is_word_start(0x80));
    assert!(!is_word_start(b'\''));
    assert!(is_word_char(b'\''));
}

#[rstest]
#[case("0", 1)]
#[case("0:", 1)]
#[case("0 ,", 2)]
#[case("1,2 ", 1)]
#[case("[[[[ ]]]],null", 9)]
#[case("null ,", 5)]
#[case("foo bar", 4)]
#[case("\"foo\\\"bar\",", 10)]
#[case("'it''s'", 4)]
#[case("{\"a\":{\"b\":[1,2]},\"c\":3} x", 24)]
#[case("[1,2", 4)]
#[case("\"open", 5)]
#[case("{:1}", 4)]
#[case("[1,2}", 4)]
fn skip_value_ends(#[case] text: &str, #[case] end: usize) {
    assert_eq!(skipped(text), (Ok(true), end));
}

#[rstest]
#[case("")]
#[case(",")]
#[case("]")]
#[case("}")]
#[case(":")]
#[case(" 1")]
fn skip_value_nothing(#[case] text: &str) {
    assert_eq!(skipped(text), (Ok(false), 0));
}

#[rstest]
#[timeout(Duration::from_millis(1_000))]
#[case("[:")]
#[case("[\x01]")]
#[case("{\"a\"::::}")]
#[case("[[[[[[[[[[")]
#[case("[\"\\")]
fn skip_value_terminates_on_junk(#[case] text: &str) {
    let (r, pos) = skipped(text);
    assert!(r.is_ok());
    assert!(pos <= text.len());
}

#[test]
fn depth_limit_is_exact() {
    let ok: Vec<u8> = core::iter::repeat_n(b'[', MAX_DEPTH).collect();
    let mut s = Scanner::new(&ok, 0);
    assert_eq!(s.skip_value(), Ok(true));
    assert_eq!(s.pos(), MAX_DEPTH);

    let deep: Vec<u8> = core::iter::repeat_n(b'[', MAX_DEPTH + 1).collect();
    let mut s = Scanner::new(&deep, 0);
    assert_eq!(s.skip_value(), Err(Error::DepthExceeded));
    assert_eq!(s.pos(), 0);
}

#[test]
fn depth_limit_counts_objects() {
    let mut deep = Vec::new();
    for _ in 0..=MAX_DEPTH / 2 {
        deep.extend_from_slice(b"{\"k\":[");
    }
    let mut s = Scanner::new(&deep, 0);
    assert_eq!(s.skip_value(), Err(Error::DepthExceeded));
}

#[test]
fn word_or_string() {
    let mut s = Scanner::new(b"can't stop", 0);
    assert!(s.skip_word_or_string());
    assert_eq!(s.pos(), 6);

    let mut s = Scanner::new(b"\"a\\", 0);
    assert!(s.skip_word_or_string());
    assert_eq!(s.pos(), 3);

    let mut s = Scanner::new(b"{", 0);
    assert!(!s.skip_word_or_string());
    assert_eq!(s.pos(), 0);
}

#[rstest]
#[case("true", "true", Ordering::Equal)]
#[case("key:", "key", Ordering::Equal)]
#[case("nul", "null", Ordering::Less)]
#[case("nullx", "null", Ordering::Greater)]
#[case("false", "true", Ordering::Less)]
#[case(",", "", Ordering::Equal)]
#[case("", "", Ordering::Equal)]
#[case(",", "x", Ordering::Less)]
#[case("5.0", "5", Ordering::Greater)]
fn word_comparison(#[case] text: &str, #[case] reference: &str, #[case] expected: Ordering) {
    let s = Scanner::new(text.as_bytes(), 0);
    assert_eq!(s.word_cmp(reference.as_bytes()), expected);
}

#[quickcheck_macros::quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn skip_stays_in_bounds(text: Vec<u8>) -> bool {
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let mut s = Scanner::new(&text[..end], 0);
    match s.skip_value() {
        Ok(moved) => moved == (s.pos() > 0) && s.pos() <= end,
        Err(_) => s.pos() == 0,
    }
}
