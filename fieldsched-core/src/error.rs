//! Error types for fieldsched.

use thiserror::Error;

/// Errors that can occur while expanding or submitting a recurring appointment.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRule(String),

    #[error("Unknown time convention '{0}' (expected utc, local, or an IANA zone name)")]
    UnknownConvention(String),

    #[error("End time {end} must be after start time {start}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("API request timed out after {0}s")]
    ApiTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fieldsched operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
