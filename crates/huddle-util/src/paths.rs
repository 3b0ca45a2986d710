//! Default paths for huddle components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/huddle/config.toml` or `~/.config/huddle/config.toml`
//! - Data: `$XDG_DATA_HOME/huddle` or `~/.local/share/huddle`, overridden by
//!   `HUDDLE_DATA_DIR` at the command line

use std::path::PathBuf;

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Database filename within the data directory
pub const DATABASE_FILENAME: &str = "huddle.db";

/// Application subdirectory name
const APP_DIR: &str = "huddle";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/huddle/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/huddle/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory, ignoring `HUDDLE_DATA_DIR`.
/// The CLI checks that variable itself through `--data-dir`.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
