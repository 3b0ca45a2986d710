//! Timezone normalization
//!
//! Wall-clock times are converted between zones for a specific calendar date,
//! so DST transitions are honoured. The wall time is resolved to an instant
//! in the source zone first; an ambiguous time (clocks falling back) takes
//! the earlier instant and a time inside a spring-forward gap is rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use huddle_api::Availability;
use huddle_util::{HuddleError, Result, TimeRange, format_clock, parse_clock, parse_timezone};

use crate::parse::parse_token;

/// Convert an `HH:MM` wall-clock time on `date` from one zone to another.
///
/// Both zone names are validated before anything else. When the zones are
/// identical the input is returned unchanged.
pub fn convert_time(time: &str, date: NaiveDate, from: &str, to: &str) -> Result<String> {
    let from_tz = parse_timezone(from)?;
    let to_tz = parse_timezone(to)?;
    let minutes = parse_clock(time).ok_or_else(|| HuddleError::time(time))?;

    if from_tz == to_tz {
        return Ok(time.to_string());
    }

    Ok(format_clock(convert_minutes(minutes, date, from_tz, to_tz)?))
}

/// Minutes-of-day variant of [`convert_time`] for already-parsed zones.
///
/// Fails with [`HuddleError::InvalidTime`] when the wall time does not exist
/// in `from` on `date`.
pub fn convert_minutes(minutes: u16, date: NaiveDate, from: Tz, to: Tz) -> Result<u16> {
    if from == to {
        return Ok(minutes);
    }

    let wall = NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .ok_or_else(|| HuddleError::time(format_clock(minutes)))?;
    let local = from
        .from_local_datetime(&NaiveDateTime::new(date, wall))
        .earliest()
        .ok_or_else(|| HuddleError::time(format_clock(minutes)))?;

    let converted = local.with_timezone(&to);
    Ok((converted.hour() * 60 + converted.minute()) as u16)
}

/// Convert both endpoints of a range independently.
///
/// Fails with [`HuddleError::WrapsMidnight`] when the converted range no
/// longer fits inside one calendar day.
pub fn convert_range(range: TimeRange, date: NaiveDate, from: Tz, to: Tz) -> Result<TimeRange> {
    let start = convert_minutes(range.start(), date, from, to)?;
    let end = convert_minutes(range.end(), date, from, to)?;

    TimeRange::new(start, end).ok_or_else(|| HuddleError::WrapsMidnight(range.to_string()))
}

/// Rewrite a raw availability token entered in `from` into the scheduling
/// zone `to`. Only ranges are touched; every other token is passed through.
pub fn normalize_entry(raw: &str, date: NaiveDate, from: Tz, to: Tz) -> Result<String> {
    match parse_token(raw).availability {
        Availability::Available(range) if from != to => {
            let converted = convert_range(range, date, from, to)?;
            tracing::debug!(
                %date,
                from = from.name(),
                to = to.name(),
                original = %range,
                converted = %converted,
                "Normalized entry"
            );
            Ok(converted.to_string())
        }
        _ => Ok(raw.trim().to_string()),
    }
}

/// Absolute instants for a window on `date` in the scheduling zone.
///
/// Returns `None` when either endpoint falls into a DST gap.
pub fn range_instants(range: TimeRange, date: NaiveDate, tz: Tz) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let at = |minutes: u16| {
        let wall = NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)?;
        tz.from_local_datetime(&NaiveDateTime::new(date, wall)).earliest()
    };

    Some((at(range.start())?, at(range.end())?))
}
