//! Error types for slot-engine construction and parsing.
//!
//! Validation itself never fails: policy violations are reported through
//! [`ValidationResult`](crate::ValidationResult). These errors cover malformed
//! schedules, policies, and datetime strings coming in from callers.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid weekday ordinal: {0} (expected 0=Sunday..6=Saturday)")]
    InvalidWeekday(u8),

    #[error("Invalid working hours: start {start}, end {end}")]
    InvalidHours { start: u32, end: u32 },

    #[error("Invalid break: ends at {end} before it starts at {start}")]
    InvalidBreak {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid datetime '{input}': {reason}")]
    InvalidDateTime { input: String, reason: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
