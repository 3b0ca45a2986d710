//! Configuration validation

use crate::schema::{RawConfig, RawPlayer, RawRecurring, RawWeekday};
use huddle_api::Role;
use huddle_util::{TokenShape, parse_timezone};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Player '{player_id}': {message}")]
    PlayerError { player_id: String, message: String },

    #[error("Duplicate player ID: {0}")]
    DuplicatePlayerId(String),

    #[error("Players '{first}' and '{second}' share sort_order {sort_order}")]
    DuplicateSortOrder {
        sort_order: i32,
        first: String,
        second: String,
    },

    #[error("Invalid timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Recurring entry for '{user}': {message}")]
    RecurringError { user: String, message: String },

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.engine.required_players == Some(0) {
        errors.push(ValidationError::GlobalError(
            "required_players must be at least 1".into(),
        ));
    }

    if let Some(tz) = &config.engine.timezone
        && parse_timezone(tz).is_err()
    {
        errors.push(ValidationError::InvalidTimezone(tz.clone()));
    }

    // Check for duplicate player IDs and sort orders
    let mut seen_ids = HashSet::new();
    let mut seen_orders: HashMap<i32, &str> = HashMap::new();
    for player in &config.players {
        if !seen_ids.insert(player.id.as_str()) {
            errors.push(ValidationError::DuplicatePlayerId(player.id.clone()));
        }
        if let Some(first) = seen_orders.insert(player.sort_order, &player.id) {
            errors.push(ValidationError::DuplicateSortOrder {
                sort_order: player.sort_order,
                first: first.to_string(),
                second: player.id.clone(),
            });
        }
    }

    for player in &config.players {
        errors.extend(validate_player(player));
    }

    for entry in &config.recurring {
        errors.extend(validate_recurring(entry, &seen_ids));
    }

    errors
}

fn validate_player(player: &RawPlayer) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if player.id.trim().is_empty() {
        errors.push(ValidationError::PlayerError {
            player_id: player.id.clone(),
            message: "id cannot be empty".into(),
        });
    }

    if Role::parse(&player.role).is_none() {
        errors.push(ValidationError::PlayerError {
            player_id: player.id.clone(),
            message: format!("unknown role '{}' (expected main, sub or coach)", player.role),
        });
    }

    if let Some(tz) = &player.timezone
        && parse_timezone(tz).is_err()
    {
        errors.push(ValidationError::InvalidTimezone(tz.clone()));
    }

    errors
}

fn validate_recurring(entry: &RawRecurring, known_ids: &HashSet<&str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !known_ids.contains(entry.user.as_str()) {
        errors.push(ValidationError::RecurringError {
            user: entry.user.clone(),
            message: "no such player".into(),
        });
    }

    if let Err(e) = parse_weekday(&entry.day) {
        errors.push(ValidationError::RecurringError {
            user: entry.user.clone(),
            message: e,
        });
    }

    if !TokenShape::classify(&entry.availability).is_valid() {
        errors.push(ValidationError::RecurringError {
            user: entry.user.clone(),
            message: format!(
                "availability '{}' must be HH:MM-HH:MM, 'x' or empty",
                entry.availability
            ),
        });
    }

    errors
}

/// Parse a weekday into Monday = 0 ... Sunday = 6
pub fn parse_weekday(day: &RawWeekday) -> Result<u8, String> {
    match day {
        RawWeekday::Index(i) if *i <= 6 => Ok(*i),
        RawWeekday::Index(i) => Err(format!("Weekday index {} out of range 0-6", i)),
        RawWeekday::Name(name) => match name.to_lowercase().as_str() {
            "mon" | "monday" => Ok(0),
            "tue" | "tuesday" => Ok(1),
            "wed" | "wednesday" => Ok(2),
            "thu" | "thursday" => Ok(3),
            "fri" | "friday" => Ok(4),
            "sat" | "saturday" => Ok(5),
            "sun" | "sunday" => Ok(6),
            other => Err(format!("Unknown day: {}", other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, role: &str, sort_order: i32) -> RawPlayer {
        RawPlayer {
            id: id.into(),
            name: id.to_uppercase(),
            role: role.into(),
            sort_order,
            timezone: None,
        }
    }

    fn config_with(players: Vec<RawPlayer>, recurring: Vec<RawRecurring>) -> RawConfig {
        RawConfig {
            config_version: 1,
            engine: Default::default(),
            service: Default::default(),
            players,
            recurring,
        }
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday(&RawWeekday::Name("mon".into())).unwrap(), 0);
        assert_eq!(parse_weekday(&RawWeekday::Name("Sunday".into())).unwrap(), 6);
        assert_eq!(parse_weekday(&RawWeekday::Index(3)).unwrap(), 3);

        assert!(parse_weekday(&RawWeekday::Index(7)).is_err());
        assert!(parse_weekday(&RawWeekday::Name("someday".into())).is_err());
    }

    #[test]
    fn test_duplicate_id_detection() {
        let config = config_with(vec![player("p1", "main", 1), player("p1", "sub", 2)], vec![]);

        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicatePlayerId(id) if id == "p1")));
    }

    #[test]
    fn test_duplicate_sort_order_detection() {
        let config = config_with(vec![player("p1", "sub", 6), player("p2", "sub", 6)], vec![]);

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::DuplicateSortOrder { sort_order: 6, .. }
        )));
    }

    #[test]
    fn test_unknown_role() {
        let config = config_with(vec![player("p1", "captain", 1)], vec![]);

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::PlayerError { .. }));
    }

    #[test]
    fn test_bad_player_timezone() {
        let mut p = player("p1", "main", 1);
        p.timezone = Some("Europe/Atlantis".into());

        let errors = validate_config(&config_with(vec![p], vec![]));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidTimezone(tz) if tz == "Europe/Atlantis")));
    }

    #[test]
    fn test_recurring_validation() {
        let recurring = vec![
            RawRecurring {
                user: "ghost".into(),
                day: RawWeekday::Index(0),
                availability: "18:00-22:00".into(),
                active: true,
            },
            RawRecurring {
                user: "p1".into(),
                day: RawWeekday::Name("funday".into()),
                availability: "22:00-02:00".into(),
                active: true,
            },
        ];
        let config = config_with(vec![player("p1", "main", 1)], recurring);

        let errors = validate_config(&config);
        // unknown user, bad weekday, overnight range
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::RecurringError { .. })));
    }

    #[test]
    fn test_zero_required_players() {
        let mut config = config_with(vec![], vec![]);
        config.engine.required_players = Some(0);

        let errors = validate_config(&config);
        assert!(matches!(errors[0], ValidationError::GlobalError(_)));
    }

    #[test]
    fn test_recurring_zero_length_range_rejected() {
        let recurring = vec![RawRecurring {
            user: "p1".into(),
            day: RawWeekday::Index(2),
            availability: "14:00-14:00".into(),
            active: true,
        }];
        let config = config_with(vec![player("p1", "main", 1)], recurring);

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::RecurringError { .. }));
    }
}
