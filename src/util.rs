use chrono::{DateTime, SecondsFormat, Utc};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// RFC 3339 in UTC with millisecond precision, or `-` when absent or out of range.
pub fn format_timestamp(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "-".to_owned())
}

pub fn minutes_before(now: i64, minutes: u32) -> i64 {
    now - i64::from(minutes) * 60_000
}

pub fn minutes_ago(minutes: u32) -> i64 {
    minutes_before(now_millis(), minutes)
}
