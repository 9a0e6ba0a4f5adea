//! Payload extraction: `data.data`, then `data`, then the envelope itself

use serde_json::Value;

fn usable(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Pick the payload out of a successful envelope
///
/// Candidates are tried in a fixed order and the first non-null object or
/// array wins. The order must not change; some endpoints wrap a list in
/// `data.data` next to pagination fields in `data`.
pub fn extract_payload(raw: &Value) -> Value {
    let data = raw.get("data");
    let nested = data.and_then(|d| d.get("data"));

    [nested, data]
        .into_iter()
        .flatten()
        .find(|v| usable(v))
        .unwrap_or(raw)
        .clone()
}
