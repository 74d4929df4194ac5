//! Time-related utilities with clock abstraction for testability.
//!
//! Two kinds of time appear in cowatch:
//!
//! - wall-clock instants (when a participant connected), as Unix milliseconds
//! - playback positions inside a video, as fractional seconds

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_utc_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a playback position as `M:SS`.
///
/// The position is rounded to the nearest whole second; minutes are not
/// wrapped into hours. Negative and non-finite inputs render as `0:00`.
pub fn format_playback_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parse an ISO 8601 duration such as `PT1H4M13S` into seconds.
///
/// Only the day and time designators used for video lengths are accepted
/// (`D`, `H`, `M`, `S`). Returns `None` for anything else.
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let rest = value.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut seconds = 0.0;
    let mut saw_component = false;

    if !date_part.is_empty() {
        let days = date_part.strip_suffix('D')?;
        seconds += days.parse::<f64>().ok()? * 86_400.0;
        saw_component = true;
    }

    if let Some(time) = time_part {
        let mut number = String::new();
        for ch in time.chars() {
            match ch {
                '0'..='9' | '.' => number.push(ch),
                'H' | 'M' | 'S' => {
                    let amount = number.parse::<f64>().ok()?;
                    number.clear();
                    seconds += match ch {
                        'H' => amount * 3_600.0,
                        'M' => amount * 60.0,
                        _ => amount,
                    };
                    saw_component = true;
                }
                _ => return None,
            }
        }
        if !number.is_empty() {
            return None;
        }
    }

    saw_component.then_some(seconds)
}
