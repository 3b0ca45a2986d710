//! Configuration parsing and validation for huddle
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Engine settings (quorum size, scheduling timezone)
//! - Roster definitions with roles, sort order and home timezones
//! - Recurring weekly availability
//! - Validation with clear error messages

mod schema;
mod team;
mod validation;

pub use schema::*;
pub use team::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<TeamConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<TeamConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "Configuration failed validation");
        return Err(ConfigError::ValidationFailed { errors });
    }

    let team = TeamConfig::from_raw(raw);
    tracing::debug!(
        players = team.roster.len(),
        recurring = team.recurring.len(),
        timezone = team.engine.timezone.name(),
        "Configuration parsed"
    );
    Ok(team)
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;
