//! Validated team configuration

use crate::schema::{RawConfig, RawPlayer, RawRecurring, RawServiceConfig};
use crate::validation::parse_weekday;
use chrono_tz::Tz;
use huddle_api::{RecurringAvailabilityEntry, Role, RosterMember};
use huddle_util::{UserId, data_dir_without_env, parse_timezone};
use std::path::PathBuf;

/// Default quorum size
pub const DEFAULT_REQUIRED_PLAYERS: usize = 5;

/// Validated configuration ready for use by the engine and the CLI
#[derive(Debug, Clone)]
pub struct TeamConfig {
    pub engine: EngineConfig,
    pub service: ServiceConfig,
    /// Roster in configuration order
    pub roster: Vec<RosterMember>,
    /// Recurring entries declared in config
    pub recurring: Vec<RecurringAvailabilityEntry>,
}

impl TeamConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let engine = EngineConfig {
            required_players: raw
                .engine
                .required_players
                .unwrap_or(DEFAULT_REQUIRED_PLAYERS),
            timezone: raw
                .engine
                .timezone
                .as_deref()
                .and_then(|tz| parse_timezone(tz).ok())
                .unwrap_or(Tz::UTC),
        };

        Self {
            engine,
            service: ServiceConfig::from_raw(raw.service),
            roster: raw.players.into_iter().filter_map(convert_player).collect(),
            recurring: raw
                .recurring
                .into_iter()
                .filter_map(convert_recurring)
                .collect(),
        }
    }

    /// Get roster member by ID
    pub fn get_member(&self, id: &UserId) -> Option<&RosterMember> {
        self.roster.iter().find(|m| &m.user_id == id)
    }

    /// Timezone a member's local-time entries are written in
    pub fn member_timezone(&self, id: &UserId) -> Tz {
        self.get_member(id)
            .and_then(|m| m.timezone.as_deref())
            .and_then(|tz| parse_timezone(tz).ok())
            .unwrap_or(self.engine.timezone)
    }
}

/// Settings passed explicitly into every engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum MAIN-equivalent players needed to train
    pub required_players: usize,
    /// Canonical scheduling timezone
    pub timezone: Tz,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            required_players: DEFAULT_REQUIRED_PLAYERS,
            timezone: Tz::UTC,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(data_dir_without_env),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: data_dir_without_env(),
        }
    }
}

// Conversion helpers. Validation has already rejected anything these drop.

fn convert_player(raw: RawPlayer) -> Option<RosterMember> {
    Some(RosterMember {
        user_id: UserId::new(raw.id),
        display_name: raw.name,
        role: Role::parse(&raw.role)?,
        sort_order: raw.sort_order,
        timezone: raw.timezone,
    })
}

fn convert_recurring(raw: RawRecurring) -> Option<RecurringAvailabilityEntry> {
    Some(RecurringAvailabilityEntry {
        user_id: UserId::new(raw.user),
        day_of_week: parse_weekday(&raw.day).ok()?,
        availability: raw.availability.trim().to_string(),
        active: raw.active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config;

    #[test]
    fn test_defaults() {
        let config = parse_config("config_version = 1").unwrap();
        assert_eq!(config.engine.required_players, 5);
        assert_eq!(config.engine.timezone, Tz::UTC);
        assert!(config.roster.is_empty());
    }

    #[test]
    fn test_member_timezone_falls_back_to_engine() {
        let config = parse_config(
            r#"
            config_version = 1

            [engine]
            timezone = "Europe/Berlin"

            [[players]]
            id = "p1"
            name = "Alice"
            role = "main"
            sort_order = 1
            timezone = "America/New_York"

            [[players]]
            id = "p2"
            name = "Bob"
            role = "main"
            sort_order = 2
            "#,
        )
        .unwrap();

        assert_eq!(
            config.member_timezone(&UserId::new("p1")),
            Tz::America__New_York
        );
        assert_eq!(config.member_timezone(&UserId::new("p2")), Tz::Europe__Berlin);
        assert_eq!(
            config.member_timezone(&UserId::new("unknown")),
            Tz::Europe__Berlin
        );
    }

    #[test]
    fn test_recurring_conversion() {
        let config = parse_config(
            r#"
            config_version = 1

            [[players]]
            id = "p1"
            name = "Alice"
            role = "sub"
            sort_order = 6

            [[recurring]]
            user = "p1"
            day = "wednesday"
            availability = " 18:00-22:00 "
            "#,
        )
        .unwrap();

        assert_eq!(config.roster[0].role, Role::Sub);
        assert_eq!(
            config.recurring,
            vec![RecurringAvailabilityEntry {
                user_id: UserId::new("p1"),
                day_of_week: 2,
                availability: "18:00-22:00".into(),
                active: true,
            }]
        );
    }
}
