//! Config validation CLI tool
//!
//! Validates a huddle configuration file and reports any errors.

use huddle_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a huddle team configuration file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match huddle_config::load_config(&config_path) {
        Ok(team) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", huddle_config::CURRENT_CONFIG_VERSION);
            println!("  Required players: {}", team.engine.required_players);
            println!("  Scheduling timezone: {}", team.engine.timezone.name());
            println!("  Players: {}", team.roster.len());
            println!("  Recurring entries: {}", team.recurring.len());

            if !team.roster.is_empty() {
                println!();
                println!("Roster:");
                let mut roster: Vec<_> = team.roster.iter().collect();
                roster.sort_by_key(|m| (m.sort_order, m.user_id.clone()));
                for member in roster {
                    println!(
                        "  {:>3}. {} [{}] {}",
                        member.sort_order,
                        member.user_id,
                        member.role.as_str(),
                        member.display_name
                    );
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                huddle_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                huddle_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                huddle_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                huddle_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        huddle_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
