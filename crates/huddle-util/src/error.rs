//! Error types for huddle

use thiserror::Error;

use crate::UserId;

/// Core error type for huddle operations
#[derive(Debug, Error)]
pub enum HuddleError {
    #[error("Invalid timezone: '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("Range {0} wraps past midnight after conversion")]
    WrapsMidnight(String),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl HuddleError {
    pub fn timezone(name: impl Into<String>) -> Self {
        Self::InvalidTimezone(name.into())
    }

    pub fn time(value: impl Into<String>) -> Self {
        Self::InvalidTime(value.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HuddleError>;

/// Resolve an IANA zone name such as `Europe/Berlin`
pub fn parse_timezone(name: &str) -> Result<chrono_tz::Tz> {
    name.trim()
        .parse::<chrono_tz::Tz>()
        .map_err(|_| HuddleError::timezone(name))
}
