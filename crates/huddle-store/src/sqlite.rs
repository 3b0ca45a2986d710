//! SQLite-based store implementation

use chrono::NaiveDate;
use huddle_api::{AbsencePeriod, DayRecord, RecurringAvailabilityEntry};
use huddle_util::UserId;
use rusqlite::{Connection, params, params_from_iter};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{Store, StoreError, StoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- One row per materialized day
            CREATE TABLE IF NOT EXISTS days (
                date TEXT PRIMARY KEY,
                reason TEXT NOT NULL DEFAULT '',
                focus TEXT NOT NULL DEFAULT ''
            );

            -- Explicit per-date availability entries
            CREATE TABLE IF NOT EXISTS entries (
                date TEXT NOT NULL,
                user_id TEXT NOT NULL,
                raw_value TEXT NOT NULL,
                PRIMARY KEY (date, user_id)
            );

            -- Leave periods, inclusive bounds
            CREATE TABLE IF NOT EXISTS absences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                reason TEXT
            );

            -- Weekly defaults (Monday = 0)
            CREATE TABLE IF NOT EXISTS recurring (
                user_id TEXT NOT NULL,
                day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
                availability TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (user_id, day_of_week)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            CREATE INDEX IF NOT EXISTS idx_absences_range ON absences(start_date, end_date);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn upsert_day(&self, date: NaiveDate, reason: &str, focus: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let day_str = date_key(date);

        conn.execute(
            r#"
            INSERT INTO days (date, reason, focus)
            VALUES (?, ?, ?)
            ON CONFLICT(date)
            DO UPDATE SET reason = excluded.reason, focus = excluded.focus
            "#,
            params![day_str, reason, focus],
        )?;

        debug!(day = %day_str, reason, focus, "Day upserted");
        Ok(())
    }

    fn load_day(&self, date: NaiveDate) -> StoreResult<Option<DayRecord>> {
        Ok(self.load_days(&[date])?.remove(&date))
    }

    fn load_days(&self, dates: &[NaiveDate]) -> StoreResult<BTreeMap<NaiveDate, DayRecord>> {
        let mut days = BTreeMap::new();
        if dates.is_empty() {
            return Ok(days);
        }

        let keys: Vec<String> = dates.iter().copied().map(date_key).collect();
        let placeholders = repeat_vars(keys.len());
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT date, reason, focus FROM days WHERE date IN ({placeholders})"
        ))?;
        let rows = stmt.query_map(params_from_iter(keys.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (day_str, reason, focus) = row?;
            let date = parse_date_key(&day_str)?;
            days.insert(
                date,
                DayRecord {
                    date,
                    reason,
                    focus,
                    entries: BTreeMap::new(),
                },
            );
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT date, user_id, raw_value FROM entries WHERE date IN ({placeholders})"
        ))?;
        let rows = stmt.query_map(params_from_iter(keys.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (day_str, user_id, raw_value) = row?;
            let date = parse_date_key(&day_str)?;
            match days.get_mut(&date) {
                Some(day) => {
                    day.entries.insert(UserId::new(user_id), raw_value);
                }
                None => warn!(day = %day_str, user_id, "Entry without day record ignored"),
            }
        }

        debug!(requested = dates.len(), found = days.len(), "Days loaded");
        Ok(days)
    }

    fn set_entry(&self, date: NaiveDate, user_id: &UserId, raw_value: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let day_str = date_key(date);

        conn.execute("INSERT OR IGNORE INTO days (date) VALUES (?)", [&day_str])?;
        conn.execute(
            r#"
            INSERT INTO entries (date, user_id, raw_value)
            VALUES (?, ?, ?)
            ON CONFLICT(date, user_id)
            DO UPDATE SET raw_value = excluded.raw_value
            "#,
            params![day_str, user_id.as_str(), raw_value],
        )?;

        debug!(day = %day_str, user_id = %user_id, raw_value, "Entry set");
        Ok(())
    }

    fn seed_entries(&self, date: NaiveDate, entries: &[(UserId, String)]) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        let day_str = date_key(date);
        let tx = conn.transaction()?;

        tx.execute("INSERT OR IGNORE INTO days (date) VALUES (?)", [&day_str])?;

        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO entries (date, user_id, raw_value) VALUES (?, ?, ?)",
            )?;
            for (user_id, raw_value) in entries {
                written += stmt.execute(params![day_str, user_id.as_str(), raw_value])?;
            }
        }
        tx.commit()?;

        debug!(day = %day_str, written, "Recurring entries seeded");
        Ok(written)
    }

    fn add_absence(&self, absence: &AbsencePeriod) -> StoreResult<()> {
        if absence.end_date < absence.start_date {
            return Err(StoreError::InvalidData(format!(
                "absence for {} ends ({}) before it starts ({})",
                absence.user_id, absence.end_date, absence.start_date
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO absences (user_id, start_date, end_date, reason) VALUES (?, ?, ?, ?)",
            params![
                absence.user_id.as_str(),
                date_key(absence.start_date),
                date_key(absence.end_date),
                absence.reason,
            ],
        )?;

        debug!(
            user_id = %absence.user_id,
            start = %absence.start_date,
            end = %absence.end_date,
            "Absence recorded"
        );
        Ok(())
    }

    fn absent_users(
        &self,
        dates: &[NaiveDate],
    ) -> StoreResult<BTreeMap<NaiveDate, BTreeSet<UserId>>> {
        let mut absent: BTreeMap<NaiveDate, BTreeSet<UserId>> = BTreeMap::new();
        let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
            return Ok(absent);
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, start_date, end_date FROM absences WHERE start_date <= ? AND end_date >= ?",
        )?;
        let rows = stmt.query_map(params![date_key(*last), date_key(*first)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        for row in rows {
            let (user_id, start, end) = row?;
            let start = parse_date_key(&start)?;
            let end = parse_date_key(&end)?;
            for date in dates.iter().filter(|d| start <= **d && **d <= end) {
                absent
                    .entry(*date)
                    .or_default()
                    .insert(UserId::new(user_id.clone()));
            }
        }

        Ok(absent)
    }

    fn upsert_recurring(&self, entry: &RecurringAvailabilityEntry) -> StoreResult<()> {
        check_weekday(entry)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO recurring (user_id, day_of_week, availability, active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, day_of_week)
            DO UPDATE SET availability = excluded.availability, active = excluded.active
            "#,
            params![
                entry.user_id.as_str(),
                entry.day_of_week,
                entry.availability,
                entry.active,
            ],
        )?;

        debug!(
            user_id = %entry.user_id,
            day_of_week = entry.day_of_week,
            active = entry.active,
            "Recurring entry upserted"
        );
        Ok(())
    }

    fn seed_recurring(&self, entry: &RecurringAvailabilityEntry) -> StoreResult<bool> {
        check_weekday(entry)?;

        let conn = self.conn()?;
        let written = conn.execute(
            r#"
            INSERT OR IGNORE INTO recurring (user_id, day_of_week, availability, active)
            VALUES (?, ?, ?, ?)
            "#,
            params![
                entry.user_id.as_str(),
                entry.day_of_week,
                entry.availability,
                entry.active,
            ],
        )?;

        debug!(
            user_id = %entry.user_id,
            day_of_week = entry.day_of_week,
            written,
            "Recurring entry seeded"
        );
        Ok(written > 0)
    }

    fn active_recurring(&self) -> StoreResult<Vec<RecurringAvailabilityEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, day_of_week, availability
            FROM recurring
            WHERE active = 1
            ORDER BY user_id, day_of_week
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RecurringAvailabilityEntry {
                user_id: UserId::new(row.get::<_, String>(0)?),
                day_of_week: row.get(1)?,
                availability: row.get(2)?,
                active: true,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date_key(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StoreError::InvalidData(format!("date '{}': {}", s, e)))
}

/// `?, ?, ?` with `n` placeholders
fn repeat_vars(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn check_weekday(entry: &RecurringAvailabilityEntry) -> StoreResult<()> {
    if entry.day_of_week > 6 {
        return Err(StoreError::InvalidData(format!(
            "day_of_week {} out of range 0-6",
            entry.day_of_week
        )));
    }
    Ok(())
}
