//! Shared data model for huddle
//!
//! This crate defines the structures exchanged between the engine and its
//! collaborators:
//! - Roster members and per-day availability
//! - Day schedules and analysis results
//! - Recurring entries, leave periods and raw day records
//! - Dashboard views

mod types;

pub use types::*;

/// Current version of the serialized result format
pub const API_VERSION: u32 = 1;
