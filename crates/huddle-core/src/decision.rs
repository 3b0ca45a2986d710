//! Roster decision
//!
//! Classifies a day as off, full, needing substitutes or short-handed, and
//! picks the consensus set whose windows are intersected. The outcome is
//! recomputed from scratch on every call.

use huddle_api::{
    API_VERSION, DaySchedule, PlayerAvailability, PlayerView, Role, RosterStatus, ScheduleDetail,
    ScheduleResult,
};
use huddle_config::EngineConfig;
use huddle_util::UserId;
use std::collections::BTreeSet;
use tracing::debug;

use crate::intersect::intersect_available;

/// A day is off when its reason mentions "off" in any case
/// ("off", "Off-Day", "off day").
pub fn is_off_day(reason: &str) -> bool {
    reason.to_lowercase().contains("off")
}

/// Decide the roster status and shared window for a day.
pub fn analyze(schedule: DaySchedule, config: &EngineConfig) -> ScheduleResult {
    // listed on off days too, counts stay zero there
    let unavailable_mains: Vec<PlayerAvailability> = schedule
        .players
        .iter()
        .filter(|p| p.role == Role::Main && !p.is_available())
        .cloned()
        .collect();

    if is_off_day(&schedule.reason) {
        debug!(date = %schedule.date, reason = %schedule.reason, "Off day");
        let status_message = off_day_message(&schedule.reason);
        return ScheduleResult {
            schedule,
            status: RosterStatus::OffDay,
            available_main_count: 0,
            available_sub_count: 0,
            available_coach_count: 0,
            unavailable_mains,
            required_subs: Vec::new(),
            common_time_range: None,
            can_proceed: false,
            status_message,
        };
    }

    let required = config.required_players;
    let players = &schedule.players;

    let mains: Vec<&PlayerAvailability> = players
        .iter()
        .filter(|p| p.role == Role::Main && p.is_available())
        .collect();
    let mut subs: Vec<&PlayerAvailability> = players
        .iter()
        .filter(|p| p.role == Role::Sub && p.is_available())
        .collect();
    subs.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    let coach_count = players
        .iter()
        .filter(|p| p.role == Role::Coach && p.is_available())
        .count();

    let (status, required_subs) = if mains.len() >= required {
        (RosterStatus::FullRoster, Vec::new())
    } else if mains.len() + subs.len() >= required {
        let needed = required - mains.len();
        (RosterStatus::WithSubs, subs[..needed].to_vec())
    } else {
        (RosterStatus::NotEnough, Vec::new())
    };

    let common_time_range = match status {
        RosterStatus::FullRoster | RosterStatus::WithSubs => {
            intersect_available(mains.iter().copied().chain(required_subs.iter().copied()))
        }
        RosterStatus::OffDay | RosterStatus::NotEnough => None,
    };
    let can_proceed = matches!(status, RosterStatus::FullRoster | RosterStatus::WithSubs);

    let mut status_message = match status {
        RosterStatus::FullRoster => format!("Full roster: {} mains available", mains.len()),
        RosterStatus::WithSubs => format!(
            "Training with subs: {} out, {} filling in",
            join_names(&unavailable_mains),
            join_names(required_subs.iter().copied()),
        ),
        _ => format!(
            "Not enough players: {} of {} available",
            mains.len() + subs.len(),
            required
        ),
    };
    if can_proceed && common_time_range.is_none() {
        status_message.push_str("; no shared window");
    }

    debug!(
        date = %schedule.date,
        ?status,
        mains = mains.len(),
        subs = subs.len(),
        coaches = coach_count,
        window = ?common_time_range,
        "Schedule analyzed"
    );

    let available_main_count = mains.len();
    let available_sub_count = subs.len();
    let required_subs: Vec<PlayerAvailability> = required_subs.into_iter().cloned().collect();

    ScheduleResult {
        schedule,
        status,
        available_main_count,
        available_sub_count,
        available_coach_count: coach_count,
        unavailable_mains,
        required_subs,
        common_time_range,
        can_proceed,
        status_message,
    }
}

/// Players whose windows make up the shared window.
pub fn consensus_ids(result: &ScheduleResult) -> BTreeSet<UserId> {
    match result.status {
        RosterStatus::FullRoster | RosterStatus::WithSubs => result
            .schedule
            .players
            .iter()
            .filter(|p| p.role == Role::Main && p.is_available())
            .chain(result.required_subs.iter())
            .map(|p| p.user_id.clone())
            .collect(),
        RosterStatus::OffDay | RosterStatus::NotEnough => BTreeSet::new(),
    }
}

/// Dashboard view of a result, one row per player in schedule order.
pub fn describe(result: &ScheduleResult) -> ScheduleDetail {
    let consensus = consensus_ids(result);

    let players = result
        .schedule
        .players
        .iter()
        .map(|p| PlayerView {
            user_id: p.user_id.clone(),
            display_name: p.display_name.clone(),
            role: p.role,
            sort_order: p.sort_order,
            raw_value: p.raw_value.clone(),
            availability: p.availability,
            in_consensus: consensus.contains(&p.user_id),
        })
        .collect();

    ScheduleDetail {
        api_version: API_VERSION,
        result: result.clone(),
        players,
    }
}

fn off_day_message(reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        "Off day: no training".into()
    } else {
        format!("Off day: no training ({reason})")
    }
}

fn join_names<'a, I>(players: I) -> String
where
    I: IntoIterator<Item = &'a PlayerAvailability>,
{
    let names: Vec<&str> = players.into_iter().map(|p| p.display_name.as_str()).collect();
    if names.is_empty() {
        "nobody".into()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{apply_absence, player_availability};
    use chrono::NaiveDate;
    use huddle_api::{Availability, RosterMember};
    use huddle_util::TimeRange;

    fn player(id: &str, role: Role, sort_order: i32, raw: &str) -> PlayerAvailability {
        let member = RosterMember {
            user_id: UserId::new(id),
            display_name: id.to_uppercase(),
            role,
            sort_order,
            timezone: None,
        };
        player_availability(&member, raw, false)
    }

    fn schedule(players: Vec<PlayerAvailability>, reason: &str) -> DaySchedule {
        DaySchedule {
            date: NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
            players,
            reason: reason.into(),
            focus: String::new(),
        }
    }

    fn full_roster() -> Vec<PlayerAvailability> {
        vec![
            player("m1", Role::Main, 1, "14:00-22:00"),
            player("m2", Role::Main, 2, "16:00-20:00"),
            player("m3", Role::Main, 3, "15:00-21:00"),
            player("m4", Role::Main, 4, "14:00-20:00"),
            player("m5", Role::Main, 5, "13:00-19:00"),
        ]
    }

    fn range(s: &str) -> Option<TimeRange> {
        TimeRange::parse(s)
    }

    #[test]
    fn off_day_detection() {
        assert!(is_off_day("Off-Day"));
        assert!(is_off_day("off day"));
        assert!(is_off_day("OFF"));
        assert!(!is_off_day(""));
        assert!(!is_off_day("Scrims vs. Team Blue"));
    }

    #[test]
    fn off_day_short_circuits() {
        let mut players = full_roster();
        players[0] = player("m1", Role::Main, 1, "x");
        let result = analyze(schedule(players, "Off-Day"), &EngineConfig::default());

        assert_eq!(result.status, RosterStatus::OffDay);
        assert!(!result.can_proceed);
        assert_eq!(result.common_time_range, None);
        assert_eq!(result.available_main_count, 0);
        assert_eq!(result.available_sub_count, 0);
        assert_eq!(result.available_coach_count, 0);
        assert_eq!(result.unavailable_mains.len(), 1);
        assert_eq!(result.unavailable_mains[0].user_id, UserId::new("m1"));
        assert!(result.required_subs.is_empty());
    }

    #[test]
    fn full_roster_window() {
        let result = analyze(schedule(full_roster(), ""), &EngineConfig::default());

        assert_eq!(result.status, RosterStatus::FullRoster);
        assert!(result.can_proceed);
        assert_eq!(result.available_main_count, 5);
        assert_eq!(result.common_time_range, range("16:00-19:00"));
        assert!(result.status_message.starts_with("Full roster"));
    }

    #[test]
    fn full_roster_ignores_subs_for_window() {
        let mut players = full_roster();
        players.push(player("s1", Role::Sub, 6, "17:00-18:00"));

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        assert_eq!(result.status, RosterStatus::FullRoster);
        assert_eq!(result.available_sub_count, 1);
        assert_eq!(result.common_time_range, range("16:00-19:00"));
    }

    #[test]
    fn substitute_tie_break_takes_lowest_sort_order() {
        let mut players = full_roster();
        players[4] = player("m5", Role::Main, 5, "x");
        // listed out of order on purpose
        players.push(player("s7", Role::Sub, 7, "17:30-18:00"));
        players.push(player("s6", Role::Sub, 6, "14:00-22:00"));

        let result = analyze(schedule(players, ""), &EngineConfig::default());

        assert_eq!(result.status, RosterStatus::WithSubs);
        assert!(result.can_proceed);
        assert_eq!(result.required_subs.len(), 1);
        assert_eq!(result.required_subs[0].sort_order, 6);
        assert_eq!(result.available_sub_count, 2);
        // s7's narrower window does not constrain the result
        assert_eq!(result.common_time_range, range("16:00-20:00"));
        assert!(result.status_message.contains("M5"));
        assert!(result.status_message.contains("S6"));
    }

    #[test]
    fn equal_sort_order_breaks_on_user_id() {
        let mut players = full_roster();
        players.truncate(4);
        players.push(player("sb", Role::Sub, 6, "14:00-22:00"));
        players.push(player("sa", Role::Sub, 6, "14:00-22:00"));

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        assert_eq!(result.required_subs[0].user_id.as_str(), "sa");
    }

    #[test]
    fn insufficient_roster_has_no_window() {
        let players = vec![
            player("m1", Role::Main, 1, "14:00-20:00"),
            player("m2", Role::Main, 2, "15:00-19:00"),
            player("m3", Role::Main, 3, ""),
        ];

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        assert_eq!(result.status, RosterStatus::NotEnough);
        assert!(!result.can_proceed);
        assert_eq!(result.common_time_range, None);
        assert_eq!(result.unavailable_mains.len(), 1);
        assert!(result.status_message.starts_with("Not enough"));
    }

    #[test]
    fn empty_roster_is_not_enough() {
        let result = analyze(schedule(vec![], ""), &EngineConfig::default());
        assert_eq!(result.status, RosterStatus::NotEnough);
    }

    #[test]
    fn coaches_never_count() {
        let mut players = full_roster();
        players.truncate(4);
        players.push(player("c1", Role::Coach, 10, "14:00-22:00"));

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        assert_eq!(result.status, RosterStatus::NotEnough);
        assert_eq!(result.available_coach_count, 1);
    }

    #[test]
    fn absence_excludes_main_from_consensus() {
        let mut players = full_roster();
        players.push(player("s6", Role::Sub, 6, "17:00-18:00"));
        apply_absence(&mut players[3]);

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        assert_eq!(result.status, RosterStatus::WithSubs);
        assert_eq!(result.unavailable_mains.len(), 1);
        assert!(result.unavailable_mains[0].is_absent());
        assert_eq!(result.unavailable_mains[0].availability, Availability::Absent);
        assert_eq!(result.common_time_range, range("17:00-18:00"));
    }

    #[test]
    fn sufficient_roster_without_overlap() {
        let players = vec![
            player("m1", Role::Main, 1, "08:00-12:00"),
            player("m2", Role::Main, 2, "14:00-20:00"),
        ];
        let config = EngineConfig {
            required_players: 2,
            ..EngineConfig::default()
        };

        let result = analyze(schedule(players, ""), &config);
        assert_eq!(result.status, RosterStatus::FullRoster);
        assert!(result.can_proceed);
        assert_eq!(result.common_time_range, None);
        assert!(result.status_message.contains("no shared window"));
    }

    #[test]
    fn quorum_comes_from_config() {
        let mut players = full_roster();
        players.truncate(3);
        let config = EngineConfig {
            required_players: 3,
            ..EngineConfig::default()
        };

        let result = analyze(schedule(players, ""), &config);
        assert_eq!(result.status, RosterStatus::FullRoster);
        assert_eq!(result.common_time_range, range("16:00-20:00"));
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let mut players = full_roster();
        players[0] = player("m1", Role::Main, 1, "x");
        players.push(player("s6", Role::Sub, 6, "15:00-23:00"));

        let a = analyze(schedule(players.clone(), ""), &EngineConfig::default());
        let b = analyze(schedule(players, ""), &EngineConfig::default());

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn describe_marks_consensus() {
        let mut players = full_roster();
        players[4] = player("m5", Role::Main, 5, "");
        players.push(player("s6", Role::Sub, 6, "14:00-22:00"));
        players.push(player("s7", Role::Sub, 7, "14:00-22:00"));

        let result = analyze(schedule(players, ""), &EngineConfig::default());
        let detail = describe(&result);

        assert_eq!(detail.api_version, API_VERSION);
        assert_eq!(detail.players.len(), 7);
        let in_consensus: Vec<&str> = detail
            .players
            .iter()
            .filter(|p| p.in_consensus)
            .map(|p| p.user_id.as_str())
            .collect();
        assert_eq!(in_consensus, vec!["m1", "m2", "m3", "m4", "s6"]);
    }

    #[test]
    fn describe_not_enough_has_empty_consensus() {
        let result = analyze(
            schedule(vec![player("m1", Role::Main, 1, "14:00-20:00")], ""),
            &EngineConfig::default(),
        );
        assert!(describe(&result).players.iter().all(|p| !p.in_consensus));
    }
}
