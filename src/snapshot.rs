//! Status document access.
//!
//! A status snapshot is the `serverStatus` reply converted to relaxed
//! extended JSON. The sampler only ever reads it through [`resolve_path`]
//! and [`host_identity`]; nothing is retained past the tick that fetched it.

use serde_json::Value;

/// One point-in-time status document.
pub type StatusSnapshot = Value;

/// Top-level field carrying the server's `host:port` identity.
pub const HOST_FIELD: &str = "host";

/// Resolves a dot-separated `path` to a numeric leaf.
///
/// Every intermediate node must be an object containing the next segment.
/// Integer and floating-point leaves are returned as `f64`; strings,
/// booleans, objects, arrays, null and missing keys all yield `None`.
pub fn resolve_path(snapshot: &StatusSnapshot, path: &str) -> Option<f64> {
    let mut node = snapshot;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    match node {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Extracts the server host identity, if the document carries one.
pub fn host_identity(snapshot: &StatusSnapshot) -> Option<String> {
    match snapshot.get(HOST_FIELD)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status() -> StatusSnapshot {
        json!({
            "host": "db-1:27017",
            "uptime": 3600.5,
            "connections": { "current": 12, "available": 838848 },
            "network": { "bytesIn": 9_007_199_254_740_993_i64, "physicalBytesIn": 1024 },
            "opcounters": { "insert": 10, "query": 250, "getmore": 0 },
            "repl": { "ismaster": true, "setName": "rs0" },
            "wiredTiger": { "cache": { "bytes currently in the cache": 2048.0 } },
            "locks": null,
            "asserts": [1, 2, 3]
        })
    }

    #[test]
    fn test_resolve_integer_and_float_leaves() {
        let doc = status();
        assert_eq!(resolve_path(&doc, "connections.current"), Some(12.0));
        assert_eq!(resolve_path(&doc, "uptime"), Some(3600.5));
        assert_eq!(resolve_path(&doc, "opcounters.getmore"), Some(0.0));
        assert_eq!(
            resolve_path(&doc, "wiredTiger.cache.bytes currently in the cache"),
            Some(2048.0)
        );
    }

    #[test]
    fn test_resolve_large_integer_is_coerced() {
        let doc = status();
        assert_eq!(
            resolve_path(&doc, "network.bytesIn"),
            Some(9_007_199_254_740_993_i64 as f64)
        );
    }

    #[test]
    fn test_resolve_missing_keys() {
        let doc = status();
        assert_eq!(resolve_path(&doc, "connections.missing"), None);
        assert_eq!(resolve_path(&doc, "nothing.here"), None);
        assert_eq!(resolve_path(&doc, ""), None);
        assert_eq!(resolve_path(&doc, "connections."), None);
    }

    #[test]
    fn test_resolve_through_non_mapping() {
        let doc = status();
        assert_eq!(resolve_path(&doc, "uptime.seconds"), None);
        assert_eq!(resolve_path(&doc, "asserts.0"), None);
        assert_eq!(resolve_path(&doc, "locks.global"), None);
        assert_eq!(resolve_path(&json!(42), "anything"), None);
    }

    #[test]
    fn test_resolve_non_numeric_leaves() {
        let doc = status();
        assert_eq!(resolve_path(&doc, "host"), None);
        assert_eq!(resolve_path(&doc, "repl.ismaster"), None);
        assert_eq!(resolve_path(&doc, "repl"), None);
        assert_eq!(resolve_path(&doc, "locks"), None);
        assert_eq!(resolve_path(&doc, "asserts"), None);
    }

    #[test]
    fn test_host_identity() {
        assert_eq!(host_identity(&status()).as_deref(), Some("db-1:27017"));
        assert_eq!(host_identity(&json!({ "uptime": 1 })), None);
        assert_eq!(host_identity(&json!({ "host": "  " })), None);
        assert_eq!(host_identity(&json!({ "host": { "name": "x" } })), None);
    }
}
