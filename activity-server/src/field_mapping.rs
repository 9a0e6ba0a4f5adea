//! Built-in labels for raw backend field names

use shared::models::FieldNameMapping;

const LABELS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("uid", "User ID"),
    ("nickname", "Nickname"),
    ("activity_id", "Activity ID"),
    ("activity_name", "Activity"),
    ("sign_day", "Consecutive days"),
    ("reward", "Reward"),
    ("rewards_issued", "Rewards issued"),
    ("prize", "Prize"),
    ("cost", "Cost"),
    ("task_name", "Task"),
    ("target", "Target"),
    ("completed", "Completed"),
    ("status", "Status"),
    ("amount", "Amount"),
    ("order_no", "Order number"),
    ("score", "Score"),
    ("rank", "Rank"),
    ("participants", "Participants"),
    ("conversion_rate", "Conversion rate (%)"),
    ("start_time", "Start time"),
    ("end_time", "End time"),
    ("created_time", "Created at"),
    ("updated_time", "Updated at"),
];

/// Dictionary used when the upstream mapping is unavailable
pub fn local_field_mapping() -> FieldNameMapping {
    LABELS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_mapping_covers_record_fields() {
        let mapping = local_field_mapping();
        assert_eq!(mapping.len(), LABELS.len());
        for key in ["uid", "updated_time", "order_no"] {
            assert!(mapping.contains_key(key), "{key}");
        }
    }
}
