//! Reads a handful of settings out of a configuration document without
//! building a tree.
//!
//! Every lookup starts from the same borrowed text. Values that are absent
//! fall back to defaults, and values that are present but malformed are
//! reported instead of silently accepted.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jitjson --example config_lookup
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use jitjson::{Json, StrMode, select};

const CONFIG: &str = r#"
{
    "name": "edge-proxy",
    "listen": [
        {"addr": "0.0.0.0", "port": 80},
        {"addr": "::", "port": "443"}
    ],
    "timeouts": {"connect": 2.5, "idle": 60},
    "tls": {"enabled": true, "cert": "LS0tLS1CRUdJTg=="},
    "started": "2024-03-01T12:00:00Z"
}
"#;

fn main() {
    let doc = Json::from(CONFIG);

    let name = doc
        .select_string_or("unnamed", ".name", &[])
        .unwrap_or_default();
    println!("service: {name}");

    for (i, listener) in doc
        .select(".listen", &[])
        .ok()
        .and_then(|l| l.begin_array().ok())
        .into_iter()
        .flatten()
        .enumerate()
    {
        let mut addr = [0u8; 64];
        let len = listener
            .select(".addr", &[])
            .ok()
            .and_then(|a| a.as_str(StrMode::Safe, &mut addr).ok())
            .unwrap_or(1);
        let addr = String::from_utf8_lossy(&addr[..len - 1]);

        let port = listener.select(".port", &[]).map(|p| p.as_int());
        match port {
            Ok(port) if port.is_exact() => println!("listener {i}: {addr}:{}", port.value()),
            Ok(port) => println!(
                "listener {i}: {addr}:{} (port is not a plain number: {:?})",
                port.value(),
                port.error()
            ),
            Err(err) => println!("listener {i}: {addr} ({err})"),
        }
    }

    let connect = doc.select_double_or(5.0, ".timeouts.connect", &[]);
    let idle = doc.select_long_or(300, ".timeouts.idle", &[]);
    let write = doc.select_long_or(30, ".timeouts.write", &[]);
    println!("timeouts: connect={connect}s idle={idle}s write={write}s");

    if doc.select_bool_or(false, ".tls.enabled", &[]) {
        let cert = select!(doc, ".tls.%s", "cert").map(|c| c.as_bytes());
        match cert {
            Ok(Ok(bytes)) => println!("tls: {} certificate bytes", bytes.len()),
            Ok(Err(err)) => println!("tls: bad certificate ({err})"),
            Err(err) => println!("tls: no certificate ({err})"),
        }
    }

    match doc.select(".started", &[]).map(|s| s.as_time()) {
        Ok(Ok(t)) => println!("started at {t} ({})", jitjson::to_time_string(t).unwrap_or_default()),
        Ok(Err(err)) => println!("started: {err}"),
        Err(err) => println!("started: {err}"),
    }
}
