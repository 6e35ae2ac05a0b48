/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// New UUID v4 as a string, used for every resource id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// First `len` hex characters of a random UUID, uppercased
///
/// Used for human-readable business numbers (`ORD-2026-1A2B3C4D`).
pub fn hex_fragment(len: usize) -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    simple[..len.min(simple.len())].to_uppercase()
}

/// Calendar year (UTC) of a millisecond timestamp
pub fn year_of_millis(millis: i64) -> i32 {
    use chrono::{Datelike, TimeZone};
    chrono::Utc
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.year())
        .unwrap_or_else(|| chrono::Utc::now().year())
}
