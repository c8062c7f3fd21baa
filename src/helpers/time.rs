use std::fmt::Debug;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Source of "now" for token expiry decisions.
pub trait Clock: Send + Sync + Debug {
    /// Current time as unix seconds.
    fn now_unix(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        now_i64()
    }
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a vendor timestamp.
///
/// Accepts RFC 3339 and naive ISO 8601 (`T` or space separated, seconds optional),
/// the latter taken as UTC. A bare `YYYY-MM-DD` means midnight UTC.
/// Returns `None` for absent or unparseable input.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
}

/// Parse a `HH:MM` wall-clock time.
pub fn parse_daily_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Seconds from `now` until the next occurrence of `at` (UTC). Never zero:
/// when `now` is exactly `at`, the next run is a day later.
pub fn seconds_until_next_daily(now: DateTime<Utc>, at: NaiveTime) -> i64 {
    let today = now.date_naive().and_time(at).and_utc();
    let next = if today > now { today } else { today + Duration::days(1) };
    (next - now).num_seconds()
}
