#![expect(missing_docs)]

use jitjson::{Json, PathArg, ValueType, to_json_string};
use quickcheck::QuickCheck;
use serde_json::Value;

const DOCUMENTS: &[&str] = &[
    "null",
    "true",
    "-0",
    "1.5e-3",
    "\"\\ud83d\\ude00 \\u00e9\\t\\\"\"",
    "[]",
    "{}",
    r#"[1, -2, 3.25, 1e10, "four", [5, [6]], {"seven": 7}]"#,
    r#"{
        "name": "jitjson",
        "version": [0, 1, 0],
        "flags": {"fast": true, "lazy": true, "strict": false},
        "empty": "",
        "nothing": null,
        "escapes": "line\nbreak ü \/ \\",
        "nested": {"a": {"b": {"c": [[], {}, [{}]]}}}
    }"#,
];

/// Walks `json` alongside the `serde_json` reading of the same text.
fn assert_matches(json: Json<'_>, expected: &Value) {
    match expected {
        Value::Null => {
            assert_eq!(json.value_type(), ValueType::Null);
            assert!(json.is_null());
        }
        Value::Bool(b) => {
            assert_eq!(json.value_type(), ValueType::Bool);
            assert_eq!(json.as_bool().into_result(), Ok(*b));
        }
        Value::Number(n) => {
            assert_eq!(json.value_type(), ValueType::Number);
            assert_eq!(json.as_double().into_result().ok(), n.as_f64());
            if let Some(i) = n.as_i64() {
                assert_eq!(json.as_long().into_result(), Ok(i));
            }
        }
        Value::String(s) => {
            assert_eq!(json.value_type(), ValueType::String);
            assert_eq!(json.as_string().as_ref(), Ok(s));
            assert!(json.str_cmp(s).is_eq());
        }
        Value::Array(elements) => {
            assert_eq!(json.value_type(), ValueType::Array);
            let mut it = json.begin_array().unwrap();
            for (i, element) in elements.iter().enumerate() {
                let found = it.next().unwrap();
                assert_matches(found, element);
                let index = u32::try_from(i).unwrap();
                assert_eq!(json.select("[%u]", &[PathArg::UInt(index)]), Ok(found));
            }
            assert!(it.next().is_none());
        }
        Value::Object(members) => {
            assert_eq!(json.value_type(), ValueType::Object);
            let mut it = json.begin_object().unwrap();
            for (key, value) in members {
                let (k, v) = it.next().unwrap();
                assert_eq!(k.as_string().as_ref(), Ok(key));
                assert_matches(v, value);
                assert_eq!(json.select(".%s", &[PathArg::Str(key)]), Ok(v));
            }
            assert!(it.next().is_none());
        }
    }
}

#[test]
fn agrees_with_serde_json() {
    for text in DOCUMENTS {
        let expected: Value = serde_json::from_str(text).unwrap();
        let doc = Json::from(*text);
        assert_matches(doc, &expected);

        let span = doc.span().unwrap();
        assert_eq!(text[span..].trim(), "", "{text}");
    }
}

#[test]
fn reads_what_serde_json_writes_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(s: String) -> bool {
        let json = serde_json::to_string(&s).unwrap();
        Json::from(json.as_str()).as_string().as_ref() == Ok(&s) || s.contains('\0')
    }

    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn writes_what_serde_json_reads_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(s: String) -> bool {
        let json = to_json_string(&s).unwrap();
        serde_json::from_str::<String>(&json).is_ok_and(|back| back == s)
    }

    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(String) -> bool);
}
