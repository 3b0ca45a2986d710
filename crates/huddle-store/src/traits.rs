//! Store trait definitions

use chrono::NaiveDate;
use huddle_api::{AbsencePeriod, DayRecord, RecurringAvailabilityEntry};
use huddle_util::UserId;
use std::collections::{BTreeMap, BTreeSet};

use crate::StoreResult;

/// Main store trait
pub trait Store: Send + Sync {
    // Day records

    /// Create a day record or update its reason and focus
    fn upsert_day(&self, date: NaiveDate, reason: &str, focus: &str) -> StoreResult<()>;

    /// Load one day with its explicit entries, `None` if no record exists
    fn load_day(&self, date: NaiveDate) -> StoreResult<Option<DayRecord>>;

    /// Load all existing records among `dates`
    fn load_days(&self, dates: &[NaiveDate]) -> StoreResult<BTreeMap<NaiveDate, DayRecord>>;

    // Availability entries

    /// Write an explicit entry, creating the day record if needed
    fn set_entry(&self, date: NaiveDate, user_id: &UserId, raw_value: &str) -> StoreResult<()>;

    /// Insert entries only where the user has none for that date.
    /// Returns the number of rows written.
    fn seed_entries(&self, date: NaiveDate, entries: &[(UserId, String)]) -> StoreResult<usize>;

    // Absences

    /// Record a leave period
    fn add_absence(&self, absence: &AbsencePeriod) -> StoreResult<()>;

    /// Users on leave for each of `dates`; dates with nobody absent are omitted
    fn absent_users(
        &self,
        dates: &[NaiveDate],
    ) -> StoreResult<BTreeMap<NaiveDate, BTreeSet<UserId>>>;

    // Recurring schedule

    /// Create or replace the entry for (user, weekday)
    fn upsert_recurring(&self, entry: &RecurringAvailabilityEntry) -> StoreResult<()>;

    /// Insert the entry only when (user, weekday) has nothing stored yet.
    /// Returns whether a row was written.
    fn seed_recurring(&self, entry: &RecurringAvailabilityEntry) -> StoreResult<bool>;

    /// All active recurring entries
    fn active_recurring(&self) -> StoreResult<Vec<RecurringAvailabilityEntry>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
