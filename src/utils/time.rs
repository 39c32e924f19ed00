//! Time utilities

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time truncated to the minute, as stored in the tables
pub fn now_minute() -> NaiveDateTime {
    truncate_to_minute(now_utc().naive_utc())
}

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    now_utc().timestamp()
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}
