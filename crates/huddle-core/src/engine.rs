//! Store-backed engine
//!
//! Fetches raw data through a [`Store`] and hands it to the pure assembly and
//! decision functions. Writes go through here too so that user-local entries
//! are normalized into the scheduling timezone before they are persisted.

use chrono::NaiveDate;
use chrono_tz::Tz;
use huddle_api::{AbsencePeriod, RecurringAvailabilityEntry, ScheduleDetail, ScheduleResult};
use huddle_config::{EngineConfig, TeamConfig};
use huddle_store::Store;
use huddle_util::{HuddleError, Result, UserId};
use std::sync::Arc;
use tracing::{debug, info};

use crate::assembly::{DayBatch, assemble_days, seed_entries};
use crate::decision::{analyze, describe};
use crate::timezone::normalize_entry;

/// The huddle engine
pub struct HuddleEngine {
    team: TeamConfig,
    store: Arc<dyn Store>,
}

impl HuddleEngine {
    pub fn new(team: TeamConfig, store: Arc<dyn Store>) -> Self {
        info!(
            players = team.roster.len(),
            required_players = team.engine.required_players,
            timezone = team.engine.timezone.name(),
            "Engine initialized"
        );

        Self { team, store }
    }

    pub fn team(&self) -> &TeamConfig {
        &self.team
    }

    pub fn config(&self) -> &EngineConfig {
        &self.team.engine
    }

    /// Seed recurring entries declared in config into the store.
    ///
    /// Config only fills (user, weekday) pairs the store has never seen, so
    /// entries edited through [`HuddleEngine::set_recurring`] are kept.
    /// Returns the number of entries written.
    pub fn sync_recurring(&self) -> Result<usize> {
        let mut seeded = 0;
        for entry in &self.team.recurring {
            if self.store.seed_recurring(entry)? {
                seeded += 1;
            }
        }

        if seeded > 0 {
            info!(seeded, "Seeded recurring entries from config");
        }
        Ok(seeded)
    }

    /// Create or update a day record and seed recurring entries for users
    /// without an explicit entry. `None` keeps the stored reason or focus.
    ///
    /// Returns the number of entries seeded.
    pub fn materialize_day(
        &self,
        date: NaiveDate,
        reason: Option<&str>,
        focus: Option<&str>,
    ) -> Result<usize> {
        let existing = self.store.load_day(date)?;

        let reason = reason
            .map(str::to_string)
            .or_else(|| existing.as_ref().map(|d| d.reason.clone()))
            .unwrap_or_default();
        let focus = focus
            .map(str::to_string)
            .or_else(|| existing.as_ref().map(|d| d.focus.clone()))
            .unwrap_or_default();
        self.store.upsert_day(date, &reason, &focus)?;

        let recurring = self.store.active_recurring()?;
        let seeds = seed_entries(date, &self.team.roster, existing.as_ref(), &recurring);
        let seeded = self.store.seed_entries(date, &seeds)?;

        info!(%date, %reason, seeded, "Day materialized");
        Ok(seeded)
    }

    /// Record a user's availability for a date.
    ///
    /// Ranges are read in `tz`, or the member's home timezone when `tz` is
    /// `None`, and stored in the scheduling timezone. Returns the stored value.
    pub fn record_entry(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        raw_value: &str,
        tz: Option<Tz>,
    ) -> Result<String> {
        self.require_member(user_id)?;

        let from = tz.unwrap_or_else(|| self.team.member_timezone(user_id));
        let stored = normalize_entry(raw_value, date, from, self.team.engine.timezone)?;
        self.store.set_entry(date, user_id, &stored)?;

        info!(%user_id, %date, raw = raw_value, %stored, "Entry recorded");
        Ok(stored)
    }

    /// Record a leave period
    pub fn record_absence(&self, absence: &AbsencePeriod) -> Result<()> {
        self.require_member(&absence.user_id)?;
        self.store.add_absence(absence)?;

        info!(
            user_id = %absence.user_id,
            start = %absence.start_date,
            end = %absence.end_date,
            "Absence recorded"
        );
        Ok(())
    }

    /// Create or replace a recurring entry
    pub fn set_recurring(&self, entry: &RecurringAvailabilityEntry) -> Result<()> {
        self.require_member(&entry.user_id)?;
        self.store.upsert_recurring(entry)?;

        info!(
            user_id = %entry.user_id,
            day_of_week = entry.day_of_week,
            active = entry.active,
            "Recurring entry saved"
        );
        Ok(())
    }

    /// Fetch everything needed for `dates`, one query per collection
    pub fn load_batch(&self, dates: &[NaiveDate]) -> Result<DayBatch> {
        let batch = DayBatch {
            days: self.store.load_days(dates)?,
            absences: self.store.absent_users(dates)?,
            recurring: self.store.active_recurring()?,
        };

        debug!(
            requested = dates.len(),
            found = batch.days.len(),
            "Loaded day batch"
        );
        Ok(batch)
    }

    /// Analyse one date; `None` if no day record exists
    pub fn analyze_date(&self, date: NaiveDate) -> Result<Option<ScheduleResult>> {
        Ok(self.analyze_dates(&[date])?.into_iter().next())
    }

    /// Analyse every date with a day record, in the order given
    pub fn analyze_dates(&self, dates: &[NaiveDate]) -> Result<Vec<ScheduleResult>> {
        let batch = self.load_batch(dates)?;

        Ok(assemble_days(dates, &self.team.roster, &batch)
            .into_iter()
            .map(|schedule| analyze(schedule, &self.team.engine))
            .collect())
    }

    /// Dashboard view for one date
    pub fn detail_for_date(&self, date: NaiveDate) -> Result<Option<ScheduleDetail>> {
        Ok(self.analyze_date(date)?.as_ref().map(describe))
    }

    fn require_member(&self, user_id: &UserId) -> Result<()> {
        match self.team.get_member(user_id) {
            Some(_) => Ok(()),
            None => Err(HuddleError::UnknownUser(user_id.clone())),
        }
    }
}
