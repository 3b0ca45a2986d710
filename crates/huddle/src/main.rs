//! huddle - team availability consensus
//!
//! Entry point for the `huddle` command line tool. It wires together:
//! - Configuration loading
//! - Store initialization and recurring-entry sync
//! - The consensus engine
//! - Text and JSON rendering

mod render;

use anyhow::{Context, Result, bail};
use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand};
use huddle_api::{AbsencePeriod, RecurringAvailabilityEntry};
use huddle_config::{RawWeekday, TeamConfig, load_config, parse_weekday};
use huddle_core::{HuddleEngine, TokenClass, convert_time, describe, parse_token};
use huddle_store::{SqliteStore, Store};
use huddle_util::{DATABASE_FILENAME, UserId, default_config_path, parse_timezone};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// huddle - Find when enough of the team can train together
#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Find when enough of the team can train together", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/huddle/config.toml)
    #[arg(short, long, global = true, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set HUDDLE_DATA_DIR env var)
    #[arg(short, long, global = true, env = "HUDDLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse one or more days
    Analyze {
        /// First day (default: today in the scheduling timezone)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Number of consecutive days
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..=31))]
        days: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Include one row per player
        #[arg(long)]
        detail: bool,
    },

    /// Write a player's availability for a day ("HH:MM-HH:MM", "x" or "")
    Set {
        user: String,
        value: String,

        /// Day (default: today in the scheduling timezone)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Timezone the value is written in (default: the player's own)
        #[arg(long)]
        tz: Option<String>,
    },

    /// Create or update a day record and seed recurring entries
    Day {
        date: NaiveDate,

        /// Free-text reason; anything containing "off" marks an off day
        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        focus: Option<String>,
    },

    /// Record a leave period (inclusive)
    Absence {
        user: String,
        start: NaiveDate,
        end: NaiveDate,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Create or replace a weekly recurring entry
    Recurring {
        user: String,

        /// Weekday name or index (Monday = 0)
        weekday: String,

        value: String,

        /// Store the entry as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Convert a wall-clock time between timezones on a given date
    Convert {
        time: String,
        date: NaiveDate,
        from: String,
        to: String,
    },
}

fn open_engine(args: &Args) -> Result<HuddleEngine> {
    let team = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        players = team.roster.len(),
        "Configuration loaded"
    );

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| team.service.data_dir.clone());

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join(DATABASE_FILENAME);
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    if !store.is_healthy() {
        bail!("Store at {:?} failed its health check", db_path);
    }
    info!(db_path = %db_path.display(), "Store initialized");

    let engine = HuddleEngine::new(team, store);
    engine
        .sync_recurring()
        .context("Failed to sync recurring entries from config")?;

    Ok(engine)
}

/// Today's date in the scheduling timezone
fn today(team: &TeamConfig) -> NaiveDate {
    if huddle_util::is_mock_time_active() {
        warn!("Mock time is active");
    }
    huddle_util::now()
        .with_timezone(&team.engine.timezone)
        .date_naive()
}

fn parse_weekday_arg(value: &str) -> Result<u8> {
    let raw = match value.trim().parse::<u8>() {
        Ok(index) => RawWeekday::Index(index),
        Err(_) => RawWeekday::Name(value.trim().to_string()),
    };
    parse_weekday(&raw).map_err(anyhow::Error::msg)
}

fn run_analyze(
    engine: &HuddleEngine,
    date: Option<NaiveDate>,
    days: u64,
    json: bool,
    detail: bool,
) -> Result<()> {
    let start = date.unwrap_or_else(|| today(engine.team()));
    let dates: Vec<NaiveDate> = (0..days)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .collect();

    let results = engine.analyze_dates(&dates)?;
    debug!(requested = dates.len(), found = results.len(), "Analysis complete");

    if json {
        let output = if detail {
            let details: Vec<_> = results.iter().map(describe).collect();
            serde_json::to_string_pretty(&details)?
        } else {
            serde_json::to_string_pretty(&results)?
        };
        println!("{output}");
        return Ok(());
    }

    let tz = engine.config().timezone;
    let mut results = results.into_iter().peekable();
    for date in dates {
        match results.next_if(|r| r.schedule.date == date) {
            Some(result) if detail => print!(
                "{}",
                render::DetailText {
                    detail: &describe(&result),
                    tz,
                }
            ),
            Some(result) => print!("{}", render::ResultText { result: &result, tz }),
            None => print!("{}", render::MissingDay(date)),
        }
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Convert {
            time,
            date,
            from,
            to,
        } => println!("{}", convert_time(time, *date, from, to)?),

        Command::Analyze {
            date,
            days,
            json,
            detail,
        } => run_analyze(&open_engine(args)?, *date, *days, *json, *detail)?,

        Command::Set {
            user,
            value,
            date,
            tz,
        } => {
            let engine = open_engine(args)?;
            let date = date.unwrap_or_else(|| today(engine.team()));
            let tz = tz.as_deref().map(parse_timezone).transpose()?;

            if parse_token(value).class == TokenClass::Invalid {
                warn!(value = %value, "Value is not a valid range or 'x'; it will count as no response");
            }

            let stored = engine.record_entry(&UserId::new(user.as_str()), date, value, tz)?;
            println!("{user} on {date}: {stored:?}");
        }

        Command::Day {
            date,
            reason,
            focus,
        } => {
            let engine = open_engine(args)?;
            let seeded = engine.materialize_day(*date, reason.as_deref(), focus.as_deref())?;
            println!("{date}: day saved, {seeded} recurring entries applied");
        }

        Command::Absence {
            user,
            start,
            end,
            reason,
        } => {
            if end < start {
                bail!("Absence ends ({end}) before it starts ({start})");
            }
            let engine = open_engine(args)?;
            engine.record_absence(&AbsencePeriod {
                user_id: UserId::new(user.as_str()),
                start_date: *start,
                end_date: *end,
                reason: reason.clone(),
            })?;
            println!("{user} absent {start} to {end}");
        }

        Command::Recurring {
            user,
            weekday,
            value,
            inactive,
        } => {
            if parse_token(value).class == TokenClass::Invalid {
                bail!("Recurring value '{value}' must be HH:MM-HH:MM, 'x' or empty");
            }
            let engine = open_engine(args)?;
            let entry = RecurringAvailabilityEntry {
                user_id: UserId::new(user.as_str()),
                day_of_week: parse_weekday_arg(weekday)?,
                availability: value.trim().to_string(),
                active: !inactive,
            };
            engine.set_recurring(&entry)?;
            println!(
                "{user}: recurring entry for weekday {} {}",
                entry.day_of_week,
                if entry.active { "saved" } else { "saved (inactive)" }
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so JSON output stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "huddle starting");

    run(&args)
}
