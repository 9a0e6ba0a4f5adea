//! Endpoint-specific shape coercions

use serde_json::Value;

/// One shape fix applied to an extracted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Force the named field to be an array (`{}` becomes `[{}]`, null becomes `[]`)
    ListField(&'static str),
    /// Rename a field, at the top level and inside every list item
    Rename {
        from: &'static str,
        to: &'static str,
    },
}

/// Apply coercions in declaration order
pub fn apply(coercions: &[Coercion], mut payload: Value) -> Value {
    for coercion in coercions {
        match *coercion {
            Coercion::ListField(field) => coerce_list(&mut payload, field),
            Coercion::Rename { from, to } => rename(&mut payload, from, to),
        }
    }
    payload
}

fn coerce_list(payload: &mut Value, field: &str) {
    let Some(map) = payload.as_object_mut() else {
        return;
    };
    let Some(slot) = map.get_mut(field) else {
        return;
    };
    match slot {
        Value::Array(_) => {}
        Value::Null => *slot = Value::Array(Vec::new()),
        other => {
            let single = other.take();
            *other = Value::Array(vec![single]);
        }
    }
}

fn rename(payload: &mut Value, from: &str, to: &str) {
    match payload {
        Value::Object(map) => {
            if let Some(value) = map.remove(from) {
                map.entry(to.to_string()).or_insert(value);
            }
            for child in map.values_mut() {
                if let Value::Array(items) = child {
                    items.iter_mut().for_each(|item| rename_flat(item, from, to));
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rename_flat(item, from, to)),
        _ => {}
    }
}

fn rename_flat(item: &mut Value, from: &str, to: &str) {
    if let Value::Object(map) = item
        && let Some(value) = map.remove(from)
    {
        map.entry(to.to_string()).or_insert(value);
    }
}
