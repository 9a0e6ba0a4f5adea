use chrono::SecondsFormat;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC timestamp in seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Current UTC time as ISO-8601 with millisecond precision (`...Z`)
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
