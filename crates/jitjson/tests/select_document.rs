#![expect(missing_docs)]

use core::fmt::Write;

use jitjson::{Json, PathArg, SelectError, select};

const CONFIG: &str = r#"
{
    "service": "billing",
    "listen": {"host": "0.0.0.0", "port": 8443},
    "upstreams": [
        {"name": "ledger", "weight": 3, "tags": ["primary", "eu"]},
        {"name": "audit", "weight": 1, "tags": []}
    ],
    "limits": {"rps": 250.5, "burst": 1e3, "enabled": true},
    "owner": null
}
"#;

fn render_selections(doc: Json<'_>, paths: &[&str]) -> String {
    let mut out = String::new();
    for path in paths {
        match doc.select(path, &[]) {
            Ok(found) => {
                let raw = found.raw().unwrap_or_default();
                writeln!(out, "{path} => {}", String::from_utf8_lossy(raw)).unwrap();
            }
            Err(err) => writeln!(out, "{path} => {err}").unwrap(),
        }
    }
    out
}

#[test]
fn snapshot_selections() {
    let paths = [
        ".service",
        "listen.port",
        ".upstreams[1].name",
        ".upstreams[0].tags[1]",
        ".upstreams[1].tags[0]",
        ".upstreams[0]",
        ".limits",
        ".owner",
        ".owner.name",
        ".upstreams[2]",
        ".upstreams[x]",
        ".upstreams[0",
        ".upstreams[-1]",
    ];

    insta::assert_snapshot!(render_selections(Json::from(CONFIG), &paths), @r#"
    .service => "billing"
    listen.port => 8443
    .upstreams[1].name => "audit"
    .upstreams[0].tags[1] => "eu"
    .upstreams[1].tags[0] => no value at path
    .upstreams[0] => {"name": "ledger", "weight": 3, "tags": ["primary", "eu"]}
    .limits => {"rps": 250.5, "burst": 1e3, "enabled": true}
    .owner => null
    .owner.name => no value at path
    .upstreams[2] => no value at path
    .upstreams[x] => bad path at byte 11: expected an index
    .upstreams[0 => bad path at byte 12: expected ']'
    .upstreams[-1] => bad path at byte 11: negative literal index
    "#);
}

#[test]
fn placeholders_walk_every_upstream() {
    let doc = Json::from(CONFIG);
    let mut names = Vec::new();
    for i in 0u32.. {
        let Ok(name) = select!(doc, ".upstreams[%u].name", i) else {
            break;
        };
        names.push(name.as_string().unwrap());
    }
    assert_eq!(names, ["ledger", "audit"]);

    let weight = select!(doc, ".%s[%d].%s", "upstreams", 0, "weight").unwrap();
    assert_eq!(weight.as_int().into_result(), Ok(3));

    let extra = doc.select(".service", &[PathArg::UInt(9), PathArg::Str("unused")]);
    assert_eq!(extra.unwrap().as_string().as_deref(), Ok("billing"));
}

#[test]
fn defaults_fill_the_gaps() {
    let doc = Json::from(CONFIG);
    assert!((doc.select_double_or(0.0, ".limits.rps", &[]) - 250.5).abs() < f64::EPSILON);
    assert_eq!(doc.select_long_or(0, ".limits.burst", &[]), 1000);
    assert!(doc.select_bool_or(false, ".limits.enabled", &[]));
    assert_eq!(doc.select_int_or(80, ".listen.missing", &[]), 80);
    assert_eq!(doc.select_string_or("eu-west", ".region", &[]).as_deref(), Ok("eu-west"));
    assert_eq!(doc.select_string_or("", ".service", &[]).as_deref(), Ok("billing"));
}

#[test]
fn syntax_errors_win_over_missing_values() {
    let doc = Json::from(CONFIG);
    assert_eq!(doc.select(".nope.also_nope", &[]), Err(SelectError::NotFound));
    assert!(matches!(
        doc.select(".nope[", &[]),
        Err(SelectError::Syntax { at: 6, .. })
    ));
}
