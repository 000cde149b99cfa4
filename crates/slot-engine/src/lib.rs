//! # slot-engine
//!
//! Deterministic appointment slot validation for expert booking.
//!
//! Given an expert's recurring schedule, the engine decides whether a single
//! timestamp is bookable and enumerates every bookable half-hour slot over a
//! window of days. Time is read from an injectable [`Clock`] and all tunables
//! live in a [`BookingPolicy`], so results are reproducible in tests.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use slot_engine::{BookingPolicy, ExpertSchedule, FixedClock, SlotEngine};
//!
//! // Monday 2025-01-06 10:00 in Ho Chi Minh City.
//! let now = Utc.with_ymd_and_hms(2025, 1, 6, 3, 0, 0).unwrap();
//! let engine = SlotEngine::with_clock(FixedClock::new(now), BookingPolicy::default());
//! let schedule = ExpertSchedule::default();
//!
//! // 13:00 local is past the two-hour lead time.
//! let at = Utc.with_ymd_and_hms(2025, 1, 6, 6, 0, 0).unwrap();
//! assert!(engine.validate(at, Some(&schedule)).is_valid);
//!
//! // The first slot today is exactly two hours out, at 12:00 local.
//! let slots = engine.enumerate_slots(&schedule, None, 1);
//! let noon = Utc.with_ymd_and_hms(2025, 1, 6, 5, 0, 0).unwrap();
//! assert_eq!(slots.first().map(|s| s.time), Some(noon));
//! ```
//!
//! ## Modules
//!
//! - [`engine`] — `SlotEngine`: validate, enumerate, format
//! - [`rules`] — Ordered booking rules and typed rejection reasons
//! - [`schedule`] — Expert working days, hours, and breaks
//! - [`policy`] — Lead time, horizon, slot interval, zone, locale, defaults
//! - [`clock`] — Injectable time sources
//! - [`format`] — Localized long-form datetime strings and parsing
//! - [`messages`] — Localized validation messages
//! - [`error`] — Error types

pub mod clock;
pub mod engine;
pub mod error;
pub mod format;
pub mod messages;
pub mod policy;
pub mod rules;
pub mod schedule;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{group_by_day, DaySlots, Slot, SlotEngine, ValidationResult, DEFAULT_SEARCH_DAYS};
pub use error::SlotError;
pub use format::{parse_datetime, INVALID_DATE};
pub use messages::Locale;
pub use policy::BookingPolicy;
pub use rules::{Rejection, Rule};
pub use schedule::{Break, ExpertSchedule, ScheduleDefaults, ScheduleInput, WeekdaySet};
