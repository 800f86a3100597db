use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// Accepted naive timestamp layouts, tried in order
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 style timestamp into naive local time
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    // A bare date means midnight
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    // Offsets are dropped, the wall-clock time is kept
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Format a timestamp the way synthesized occurrences are stored
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Map a recurrence rule to the step between occurrences.
///
/// Months are a fixed 30 days. Unknown rules do not advance at all.
pub fn recurrence_step(rule: &str) -> Duration {
    match rule {
        "daily" => Duration::days(1),
        "weekly" => Duration::days(7),
        "monthly" => Duration::days(30),
        _ => Duration::zero(),
    }
}

/// Check whether `start` falls inside `[now, now + window]`.
///
/// A window end past the representable range is never due.
pub fn is_due(now: &NaiveDateTime, start: &NaiveDateTime, window: Duration) -> bool {
    *now <= *start
        && now
            .checked_add_signed(window)
            .is_some_and(|end| *start <= end)
}

/// Due-window check on a raw stored timestamp; unparseable values are never due
pub fn starts_within(start_time: &str, now: &NaiveDateTime, window: Duration) -> bool {
    parse_timestamp(start_time)
        .map(|start| is_due(now, &start, window))
        .unwrap_or(false)
}

/// Source of the current naive local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the process's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for deterministic scans
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Move the clock to an absolute time
    pub fn set(&self, time: NaiveDateTime) {
        *self.time.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *time += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}
