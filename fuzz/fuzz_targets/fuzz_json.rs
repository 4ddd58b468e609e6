#![no_main]

use arbitrary::Arbitrary;
use jitjson::{
    Error, Json, PathArg, StrMode, decode_sanitized, encode_sanitized, string_from_unsafe_str,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    text: &'a [u8],
    path: &'a str,
    key: &'a str,
    index: u32,
    signed: i32,
}

/// Sizing, exact fill and a short buffer must all agree.
fn check_two_pass(fill: impl Fn(&mut [u8]) -> Result<usize, Error>) {
    let Ok(n) = fill(&mut []) else {
        return;
    };
    let mut exact = vec![0xa5; n];
    assert_eq!(fill(&mut exact), Ok(n));
    let mut roomy = vec![0xa5; n + 8];
    assert_eq!(fill(&mut roomy), Ok(n));
    assert_eq!(exact[..], roomy[..n]);
    if n > 1 {
        let mut short = vec![0xa5; n - 1];
        assert_eq!(fill(&mut short), Err(Error::BufferTooSmall { needed: n }));
        assert_eq!(short[0], 0);
    }
}

fn visit(json: Json<'_>, end: usize, budget: &mut usize) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;
    assert!(json.offset() <= end);

    let _ = (json.value_type(), json.is_null(), json.as_bool());
    let _ = (json.as_double(), json.as_long(), json.as_int());
    let _ = (json.as_time(), json.as_bytes());
    let _ = json.str_cmp(b"key");
    if let Some(span) = json.span() {
        assert!(json.offset() + span <= end);
    }
    check_two_pass(|buf| json.as_str(StrMode::Safe, buf));
    check_two_pass(|buf| json.as_str(StrMode::Unsafe, buf));
    check_two_pass(|buf| json.as_base64(buf));

    if let Ok(elements) = json.begin_array() {
        let mut last = None;
        for element in elements {
            assert!(last < Some(element.offset()));
            last = Some(element.offset());
            visit(element, end, budget);
        }
    }
    if let Ok(members) = json.begin_object() {
        for (key, value) in members {
            visit(key, end, budget);
            visit(value, end, budget);
        }
    }
}

fuzz_target!(|input: Input<'_>| {
    let doc = Json::new(input.text);
    let end = doc.text().len();
    let mut budget = 4096;
    visit(doc, end, &mut budget);

    let args = [
        PathArg::Str(input.key),
        PathArg::UInt(input.index),
        PathArg::Int(input.signed),
    ];
    if let Ok(found) = doc.select(input.path, &args) {
        assert!(found.offset() <= end);
    }

    check_two_pass(|dst| string_from_unsafe_str(input.text, dst));
    check_two_pass(|dst| jitjson::base64_from_bytes(input.text, dst));
    check_two_pass(|dst| jitjson::time_from(i64::from(input.signed) * 86_400, dst));

    let mut rest = input.text;
    let mut round_trip = Vec::with_capacity(rest.len());
    while !rest.is_empty() {
        let (u, n) = decode_sanitized(rest);
        let mut buf = [0u8; 4];
        let m = encode_sanitized(u, &mut buf).unwrap();
        round_trip.extend_from_slice(&buf[..m]);
        rest = &rest[n..];
    }
    assert_eq!(round_trip, input.text);
});
