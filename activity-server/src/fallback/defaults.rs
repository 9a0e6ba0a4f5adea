//! Default payloads for `FallbackPolicy::Default`

use serde_json::{Value, json};

use crate::field_mapping::local_field_mapping;

/// Configuration shown when an activity's config cannot be loaded
pub fn activity_config() -> Value {
    json!({
        "activity_id": null,
        "name": "",
        "enabled": false,
        "start_time": null,
        "end_time": null,
        "rules": {},
        "rewards": [],
        "updated_time": null,
    })
}

/// Built-in field label dictionary
pub fn field_mapping() -> Value {
    json!(local_field_mapping())
}
