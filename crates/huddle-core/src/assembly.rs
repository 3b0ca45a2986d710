//! Day assembly and recurring seeding
//!
//! A player's raw value for a date comes from, in order: an explicit entry for
//! that date (even an empty one), an active recurring entry for the weekday,
//! or the empty string. Recorded absences are applied last and always win.

use chrono::NaiveDate;
use huddle_api::{
    DaySchedule, DayRecord, RecurringAvailabilityEntry, RosterMember, ScheduleResult,
};
use huddle_config::EngineConfig;
use huddle_util::{UserId, weekday_index};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::decision::analyze;
use crate::parse::player_availability;

/// Where a resolved raw value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Explicit,
    Recurring,
    Default,
}

/// Resolve a user's raw value for `date`.
pub fn resolve_raw_value<'a>(
    user_id: &UserId,
    date: NaiveDate,
    entries: &'a BTreeMap<UserId, String>,
    recurring: &'a [RecurringAvailabilityEntry],
) -> (&'a str, ValueSource) {
    if let Some(raw) = entries.get(user_id) {
        return (raw.as_str(), ValueSource::Explicit);
    }

    let weekday = weekday_index(date);
    recurring
        .iter()
        .find(|r| r.active && r.day_of_week == weekday && &r.user_id == user_id)
        .map(|r| (r.availability.as_str(), ValueSource::Recurring))
        .unwrap_or(("", ValueSource::Default))
}

/// Build the schedule for one day record.
///
/// Entries for users outside the roster are ignored.
pub fn assemble_day(
    record: &DayRecord,
    roster: &[RosterMember],
    absent: &BTreeSet<UserId>,
    recurring: &[RecurringAvailabilityEntry],
) -> DaySchedule {
    let mut players: Vec<_> = roster
        .iter()
        .map(|member| {
            let (raw, _) = resolve_raw_value(&member.user_id, record.date, &record.entries, recurring);
            player_availability(member, raw, absent.contains(&member.user_id))
        })
        .collect();
    players.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    for user_id in record.entries.keys() {
        if !roster.iter().any(|m| &m.user_id == user_id) {
            debug!(date = %record.date, %user_id, "Ignoring entry for user not on roster");
        }
    }

    DaySchedule {
        date: record.date,
        players,
        reason: record.reason.clone(),
        focus: record.focus.clone(),
    }
}

/// Entries to write when a date is materialised: the recurring value for
/// every roster member without an explicit entry yet.
///
/// Members with no matching recurring entry are skipped so an empty row never
/// masks a recurring entry added later.
pub fn seed_entries(
    date: NaiveDate,
    roster: &[RosterMember],
    existing: Option<&DayRecord>,
    recurring: &[RecurringAvailabilityEntry],
) -> Vec<(UserId, String)> {
    let empty = BTreeMap::new();
    let entries = existing.map(|r| &r.entries).unwrap_or(&empty);

    roster
        .iter()
        .filter_map(|member| {
            match resolve_raw_value(&member.user_id, date, entries, recurring) {
                (raw, ValueSource::Recurring) => Some((member.user_id.clone(), raw.to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Everything needed to assemble several days, fetched with one query per
/// collection.
#[derive(Debug, Clone, Default)]
pub struct DayBatch {
    pub days: BTreeMap<NaiveDate, DayRecord>,
    pub absences: BTreeMap<NaiveDate, BTreeSet<UserId>>,
    pub recurring: Vec<RecurringAvailabilityEntry>,
}

/// Assemble every requested date that has a day record, in the order given.
pub fn assemble_days(dates: &[NaiveDate], roster: &[RosterMember], batch: &DayBatch) -> Vec<DaySchedule> {
    let no_absences = BTreeSet::new();

    dates
        .iter()
        .filter_map(|date| {
            let record = batch.days.get(date)?;
            let absent = batch.absences.get(date).unwrap_or(&no_absences);
            Some(assemble_day(record, roster, absent, &batch.recurring))
        })
        .collect()
}

/// Analyse a single date. `None` when there is no day record for it.
pub fn analyze_date(
    date: NaiveDate,
    roster: &[RosterMember],
    batch: &DayBatch,
    config: &EngineConfig,
) -> Option<ScheduleResult> {
    assemble_days(&[date], roster, batch)
        .into_iter()
        .next()
        .map(|schedule| analyze(schedule, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ABSENT_RAW_VALUE;
    use huddle_api::{Availability, Role, RosterStatus};
    use huddle_util::TimeRange;

    // 2026-04-15 is a Wednesday
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
    }

    fn member(id: &str, role: Role, sort_order: i32) -> RosterMember {
        RosterMember {
            user_id: UserId::new(id),
            display_name: id.to_uppercase(),
            role,
            sort_order,
            timezone: None,
        }
    }

    fn roster() -> Vec<RosterMember> {
        vec![
            member("s6", Role::Sub, 6),
            member("m2", Role::Main, 2),
            member("m1", Role::Main, 1),
        ]
    }

    fn recurring(user: &str, day: u8, value: &str, active: bool) -> RecurringAvailabilityEntry {
        RecurringAvailabilityEntry {
            user_id: UserId::new(user),
            day_of_week: day,
            availability: value.into(),
            active,
        }
    }

    fn record(entries: &[(&str, &str)]) -> DayRecord {
        let mut record = DayRecord::new(wednesday());
        for (user, raw) in entries {
            record.entries.insert(UserId::new(*user), raw.to_string());
        }
        record
    }

    #[test]
    fn explicit_entry_wins_even_when_empty() {
        let rec = record(&[("m1", "")]);
        let weekly = vec![recurring("m1", 2, "18:00-22:00", true)];

        let (raw, source) = resolve_raw_value(&UserId::new("m1"), wednesday(), &rec.entries, &weekly);
        assert_eq!(raw, "");
        assert_eq!(source, ValueSource::Explicit);
    }

    #[test]
    fn recurring_applies_on_matching_weekday_only() {
        let rec = record(&[]);
        let weekly = vec![
            recurring("m1", 1, "10:00-12:00", true),
            recurring("m1", 2, "18:00-22:00", true),
        ];

        let (raw, source) = resolve_raw_value(&UserId::new("m1"), wednesday(), &rec.entries, &weekly);
        assert_eq!(raw, "18:00-22:00");
        assert_eq!(source, ValueSource::Recurring);
    }

    #[test]
    fn inactive_recurring_is_ignored() {
        let rec = record(&[]);
        let weekly = vec![recurring("m1", 2, "18:00-22:00", false)];

        let (raw, source) = resolve_raw_value(&UserId::new("m1"), wednesday(), &rec.entries, &weekly);
        assert_eq!(raw, "");
        assert_eq!(source, ValueSource::Default);
    }

    #[test]
    fn players_sorted_and_absence_applied_last() {
        let rec = record(&[("m1", "14:00-20:00"), ("m2", "x"), ("ghost", "10:00-11:00")]);
        let absent: BTreeSet<_> = [UserId::new("m1")].into();

        let day = assemble_day(&rec, &roster(), &absent, &[]);

        let ids: Vec<&str> = day.players.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "s6"]);

        assert!(day.players[0].is_absent());
        assert_eq!(day.players[0].raw_value, ABSENT_RAW_VALUE);
        assert_eq!(day.players[1].availability, Availability::Unavailable);
        assert_eq!(day.players[2].availability, Availability::Unset);
    }

    #[test]
    fn absence_beats_recurring() {
        let rec = record(&[]);
        let absent: BTreeSet<_> = [UserId::new("s6")].into();
        let weekly = vec![recurring("s6", 2, "18:00-22:00", true)];

        let day = assemble_day(&rec, &roster(), &absent, &weekly);
        let sub = day.players.iter().find(|p| p.user_id.as_str() == "s6").unwrap();
        assert!(sub.is_absent());
    }

    #[test]
    fn seeding_skips_explicit_and_unmatched() {
        let rec = record(&[("m1", "x")]);
        let weekly = vec![
            recurring("m1", 2, "18:00-22:00", true),
            recurring("m2", 2, "17:00-21:00", true),
        ];

        let seeds = seed_entries(wednesday(), &roster(), Some(&rec), &weekly);
        assert_eq!(seeds, vec![(UserId::new("m2"), "17:00-21:00".to_string())]);

        let fresh = seed_entries(wednesday(), &roster(), None, &weekly);
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn batch_skips_dates_without_record() {
        let thursday = wednesday().succ_opt().unwrap();
        let mut batch = DayBatch::default();
        batch.days.insert(wednesday(), record(&[("m1", "14:00-20:00")]));
        batch.absences.insert(thursday, [UserId::new("m1")].into());

        let days = assemble_days(&[wednesday(), thursday], &roster(), &batch);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, wednesday());
    }

    #[test]
    fn analyze_date_missing_record() {
        let batch = DayBatch::default();
        assert!(analyze_date(wednesday(), &roster(), &batch, &EngineConfig::default()).is_none());
    }

    #[test]
    fn analyze_date_runs_pipeline() {
        let mut batch = DayBatch::default();
        batch.days.insert(wednesday(), record(&[("m1", "14:00-20:00"), ("m2", "16:00-22:00")]));
        batch.recurring.push(recurring("s6", 2, "15:00-19:00", true));

        let config = EngineConfig {
            required_players: 3,
            ..EngineConfig::default()
        };
        let result = analyze_date(wednesday(), &roster(), &batch, &config).unwrap();

        assert_eq!(result.status, RosterStatus::WithSubs);
        assert_eq!(result.common_time_range, TimeRange::parse("16:00-19:00"));
    }
}
