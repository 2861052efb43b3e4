use chrono::Utc;

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Current unix time in seconds, string-encoded the way the public records
/// carry `last_online` and `last_updated`.
pub fn unix_now_string() -> String {
    unix_now().to_string()
}

/// Current unix time in nanoseconds, for the `/stats` endpoint.
pub fn unix_now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Parses a string-encoded unix timestamp. `None` when empty or malformed.
pub fn parse_unix(ts: &str) -> Option<i64> {
    ts.parse().ok()
}
