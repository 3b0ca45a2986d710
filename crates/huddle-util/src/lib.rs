//! Shared utilities for huddle
//!
//! This crate provides:
//! - ID types (UserId)
//! - Time utilities (minutes-of-day ranges, clock parsing, mock-able clock)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
