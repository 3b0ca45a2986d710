//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Decision engine settings
    #[serde(default)]
    pub engine: RawEngineConfig,

    /// Storage settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Team roster
    #[serde(default)]
    pub players: Vec<RawPlayer>,

    /// Weekly default availability
    #[serde(default)]
    pub recurring: Vec<RawRecurring>,
}

/// Engine-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEngineConfig {
    /// Minimum players needed to train (default: 5)
    pub required_players: Option<usize>,

    /// Canonical scheduling timezone, IANA name (default: UTC)
    pub timezone: Option<String>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the store
    pub data_dir: Option<PathBuf>,
}

/// Raw roster member
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPlayer {
    /// Stable user ID (chat platform id)
    pub id: String,

    /// Display name
    pub name: String,

    /// "main", "sub" or "coach"
    pub role: String,

    /// Substitute preference order, lower first
    pub sort_order: i32,

    /// Home timezone for local-time entries
    pub timezone: Option<String>,
}

/// Recurring availability entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRecurring {
    /// Player ID
    pub user: String,

    /// Weekday: 0-6 (Monday = 0) or a name like "mon" / "monday"
    pub day: RawWeekday,

    /// Availability token ("HH:MM-HH:MM", "x" or empty)
    pub availability: String,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// Weekday, by index or name
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawWeekday {
    Index(u8),
    Name(String),
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_players() {
        let toml_str = r#"
            config_version = 1

            [[players]]
            id = "1001"
            name = "Alice"
            role = "main"
            sort_order = 1

            [[players]]
            id = "1006"
            name = "Frank"
            role = "sub"
            sort_order = 6
            timezone = "America/New_York"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[1].timezone.as_deref(), Some("America/New_York"));
        assert!(config.engine.required_players.is_none());
    }

    #[test]
    fn parse_recurring_days() {
        let toml_str = r#"
            config_version = 1

            [[recurring]]
            user = "1001"
            day = "mon"
            availability = "18:00-22:00"

            [[recurring]]
            user = "1001"
            day = 4
            availability = "x"
            active = false
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.recurring.len(), 2);
        assert!(matches!(config.recurring[0].day, RawWeekday::Name(_)));
        assert!(matches!(config.recurring[1].day, RawWeekday::Index(4)));
        assert!(config.recurring[0].active);
        assert!(!config.recurring[1].active);
    }
}
