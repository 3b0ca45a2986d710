//! Persistence layer for huddle
//!
//! Holds the raw upstream data the engine reads:
//! - Day records (reason, focus) and explicit per-date entries
//! - Leave periods (absence overrides)
//! - Recurring weekly availability
//!
//! Batch lookups for a set of dates issue one query per collection.

mod sqlite;
mod traits;

pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<StoreError> for huddle_util::HuddleError {
    fn from(e: StoreError) -> Self {
        huddle_util::HuddleError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
