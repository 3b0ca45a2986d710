//! Time utilities for huddle
//!
//! Availability is expressed in minutes since midnight of a single calendar
//! day. A [`TimeRange`] can only be constructed with `start < end`, so an
//! empty or inverted window is always represented as `None`.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `HUDDLE_MOCK_TIME` environment variable overrides the
//! current time (interpreted as UTC). Format: `YYYY-MM-DD HH:MM:SS`.
//!
//! ```bash
//! HUDDLE_MOCK_TIME="2026-03-29 12:00:00" huddle analyze
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "HUDDLE_MOCK_TIME";

/// Last representable minute of a day (23:59)
pub const LAST_MINUTE_OF_DAY: u16 = 23 * 60 + 59;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Offset between mock time and real time, computed once per process.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => {
                        let offset = naive_dt.and_utc().signed_duration_since(Utc::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current UTC time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Parse a wall-clock `H:MM` / `HH:MM` string into minutes since midnight.
///
/// Hours may have one or two digits, minutes exactly two.
pub fn parse_clock(s: &str) -> Option<u16> {
    let (h, m) = s.trim().split_once(':')?;

    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour: u16 = h.parse().ok()?;
    let minute: u16 = m.parse().ok()?;
    if hour >= 24 || minute >= 60 {
        return None;
    }

    Some(hour * 60 + minute)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
///
/// A value of 1440 (`24:00`) wraps to `00:00`.
pub fn format_clock(minutes: u16) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Day-of-week index used by recurring entries: Monday = 0 ... Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// A same-day availability window in minutes since midnight.
///
/// Invariant: `start < end <= 1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: u16,
    end: u16,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: u16,
    end: u16,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = String;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
            .ok_or_else(|| format!("invalid time range {}-{}", raw.start, raw.end))
    }
}

impl TimeRange {
    /// Returns `None` unless `start < end <= 1439`.
    pub fn new(start: u16, end: u16) -> Option<Self> {
        if start < end && end <= LAST_MINUTE_OF_DAY {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Parse `HH:MM-HH:MM`, tolerating whitespace around either clock.
    pub fn parse(s: &str) -> Option<Self> {
        let (start, end) = parse_clock_pair(s)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

/// Split a `HH:MM-HH:MM` token into its two clock values without checking
/// their order.
pub fn parse_clock_pair(s: &str) -> Option<(u16, u16)> {
    let (start, end) = s.trim().split_once('-')?;
    Some((parse_clock(start)?, parse_clock(end)?))
}

/// Shape of a raw availability token, before any absence is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Range(TimeRange),
    /// `x` or `X`
    Unavailable,
    /// Empty or whitespace
    Empty,
    /// Anything else, including zero-length and inverted ranges
    Invalid,
}

impl TokenShape {
    /// Classify a raw token. Ranges are checked before `x`, then emptiness.
    pub fn classify(raw: &str) -> Self {
        let token = raw.trim();

        if let Some((start, end)) = parse_clock_pair(token) {
            return TimeRange::new(start, end).map_or(TokenShape::Invalid, TokenShape::Range);
        }
        if token.eq_ignore_ascii_case("x") {
            return TokenShape::Unavailable;
        }
        if token.is_empty() {
            return TokenShape::Empty;
        }
        TokenShape::Invalid
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, TokenShape::Invalid)
    }
}
