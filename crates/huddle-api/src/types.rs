//! Shared types for the huddle engine and its collaborators

use chrono::NaiveDate;
use huddle_util::{TimeRange, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Roster role of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Main,
    Sub,
    Coach,
}

impl Role {
    /// Case-insensitive parse of `main`, `sub` or `coach`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "main" => Some(Role::Main),
            "sub" | "substitute" => Some(Role::Sub),
            "coach" => Some(Role::Coach),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Main => "MAIN",
            Role::Sub => "SUB",
            Role::Coach => "COACH",
        }
    }
}

/// Classified availability of one player on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Availability {
    /// No response (empty or unrecognised entry)
    Unset,
    /// Explicitly unavailable (`x`)
    Unavailable,
    /// Recorded leave period; overrides any entry
    Absent,
    Available(TimeRange),
}

impl Availability {
    pub fn time_range(&self) -> Option<TimeRange> {
        match self {
            Availability::Available(range) => Some(*range),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Availability::Absent)
    }
}

/// A configured roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    /// Externally assigned ordering; lower values are preferred as substitutes
    pub sort_order: i32,
    /// Home IANA timezone for entries written in local time
    #[serde(default)]
    pub timezone: Option<String>,
}

/// One player's availability for a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAvailability {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    pub raw_value: String,
    pub availability: Availability,
    pub sort_order: i32,
}

impl PlayerAvailability {
    pub fn time_range(&self) -> Option<TimeRange> {
        self.availability.time_range()
    }

    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    pub fn is_absent(&self) -> bool {
        self.availability.is_absent()
    }
}

/// All player entries for a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub players: Vec<PlayerAvailability>,
    /// Free text; containing "off" marks a non-training day
    pub reason: String,
    pub focus: String,
}

/// Roster sufficiency for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RosterStatus {
    OffDay,
    FullRoster,
    WithSubs,
    NotEnough,
}

/// Outcome of analysing a day schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub schedule: DaySchedule,
    pub status: RosterStatus,
    pub available_main_count: usize,
    pub available_sub_count: usize,
    pub available_coach_count: usize,
    pub unavailable_mains: Vec<PlayerAvailability>,
    pub required_subs: Vec<PlayerAvailability>,
    pub common_time_range: Option<TimeRange>,
    pub can_proceed: bool,
    pub status_message: String,
}

/// Dashboard row for a single player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    pub sort_order: i32,
    pub raw_value: String,
    pub availability: Availability,
    /// Whether this player's window was part of the intersection
    pub in_consensus: bool,
}

/// Dashboard view of an analysed day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDetail {
    pub api_version: u32,
    pub result: ScheduleResult,
    pub players: Vec<PlayerView>,
}

/// Weekly default availability for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringAvailabilityEntry {
    pub user_id: UserId,
    /// Monday = 0 ... Sunday = 6
    pub day_of_week: u8,
    pub availability: String,
    pub active: bool,
}

/// A recorded leave period, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsencePeriod {
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl AbsencePeriod {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Raw upstream row for a day: metadata plus explicit per-user entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    pub reason: String,
    pub focus: String,
    pub entries: BTreeMap<UserId, String>,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            reason: String::new(),
            focus: String::new(),
            entries: BTreeMap::new(),
        }
    }
}
