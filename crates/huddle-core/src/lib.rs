//! Availability consensus engine for huddle
//!
//! This crate turns raw per-player availability into a training decision:
//! - Token parsing into a tagged [`huddle_api::Availability`]
//! - DST-aware timezone normalization of wall-clock times
//! - Shared-window intersection
//! - Roster decision (off day, full roster, with subs, not enough)
//! - Day assembly from explicit, recurring and absence data
//!
//! Everything except [`HuddleEngine`] is pure and takes its settings as an
//! explicit [`huddle_config::EngineConfig`].

mod assembly;
mod decision;
mod engine;
mod intersect;
mod parse;
mod timezone;

pub use assembly::*;
pub use decision::*;
pub use engine::*;
pub use intersect::*;
pub use parse::*;
pub use timezone::*;
