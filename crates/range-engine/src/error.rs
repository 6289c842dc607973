//! Error types for range-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid wall-clock time: {0}")]
    InvalidWallClock(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid format pattern: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;
