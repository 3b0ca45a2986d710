//! Plain-text rendering of analysis results

use chrono::NaiveDate;
use chrono_tz::Tz;
use huddle_api::{Availability, ScheduleDetail, ScheduleResult};
use huddle_core::range_instants;
use std::fmt;

/// One block per analysed day
pub struct ResultText<'a> {
    pub result: &'a ScheduleResult,
    pub tz: Tz,
}

impl fmt::Display for ResultText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let schedule = &result.schedule;
        let tz = self.tz;

        writeln!(
            f,
            "{} ({})  {}",
            schedule.date,
            schedule.date.format("%a"),
            result.status_message
        )?;

        if let Some(range) = result.common_time_range {
            match range_instants(range, schedule.date, tz) {
                Some((start, end)) => writeln!(
                    f,
                    "  Window: {} {}, {} min ({} to {})",
                    range,
                    tz.name(),
                    range.duration_minutes(),
                    start.to_rfc3339(),
                    end.to_rfc3339()
                )?,
                None => writeln!(f, "  Window: {} {}", range, tz.name())?,
            }
        }

        writeln!(
            f,
            "  Mains: {}  Subs: {}  Coaches: {}",
            result.available_main_count, result.available_sub_count, result.available_coach_count
        )?;

        let focus = schedule.focus.trim();
        if !focus.is_empty() {
            writeln!(f, "  Focus: {}", focus)?;
        }
        Ok(())
    }
}

/// Result block followed by one line per player
pub struct DetailText<'a> {
    pub detail: &'a ScheduleDetail,
    pub tz: Tz,
}

impl fmt::Display for DetailText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = ResultText {
            result: &self.detail.result,
            tz: self.tz,
        };
        write!(f, "{}", result)?;

        for player in &self.detail.players {
            let marker = if player.in_consensus { '*' } else { ' ' };
            writeln!(
                f,
                "  {} {:>3} {:<16} {:<5} {}",
                marker,
                player.sort_order,
                player.display_name,
                player.role.as_str(),
                AvailabilityText {
                    availability: &player.availability,
                    raw_value: &player.raw_value,
                }
            )?;
        }
        Ok(())
    }
}

/// Placeholder line for a date without a day record
pub struct MissingDay(pub NaiveDate);

impl fmt::Display for MissingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})  no day record", self.0, self.0.format("%a"))
    }
}

struct AvailabilityText<'a> {
    availability: &'a Availability,
    raw_value: &'a str,
}

impl fmt::Display for AvailabilityText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.raw_value.trim();
        match self.availability {
            Availability::Available(range) => write!(f, "{}", range),
            Availability::Unavailable => f.write_str("unavailable"),
            Availability::Absent => f.write_str("absent"),
            Availability::Unset if raw.is_empty() => f.write_str("-"),
            Availability::Unset => write!(f, "- (unrecognised: {})", raw),
        }
    }
}
