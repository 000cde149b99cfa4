//! Expert availability: working days, working hours, and one-off breaks.
//!
//! Schedules arrive from the backend as partially-filled JSON ([`ScheduleInput`]).
//! Missing fields are filled from [`ScheduleDefaults`] when the input is resolved
//! into an [`ExpertSchedule`].

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A set of weekdays, stored as a bitmask indexed by days from Sunday.
///
/// Serializes as a sorted list of ordinals (0=Sunday..6=Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Monday through Friday.
    pub const WEEKDAYS: WeekdaySet = WeekdaySet(0b0011_1110);

    /// Build a set from weekday ordinals (0=Sunday..6=Saturday).
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWeekday` for any ordinal above 6.
    pub fn from_ordinals(ordinals: &[u8]) -> Result<Self> {
        ordinals.iter().try_fold(Self::EMPTY, |set, &ordinal| {
            if ordinal > 6 {
                Err(SlotError::InvalidWeekday(ordinal))
            } else {
                Ok(WeekdaySet(set.0 | (1 << ordinal)))
            }
        })
    }

    pub fn with(self, weekday: Weekday) -> Self {
        WeekdaySet(self.0 | bit(weekday))
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & bit(weekday) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member ordinals in ascending order (Sunday first).
    pub fn ordinals(self) -> Vec<u8> {
        (0..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }
}

fn bit(weekday: Weekday) -> u8 {
    1 << weekday.num_days_from_sunday()
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, WeekdaySet::with)
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = SlotError;

    fn try_from(ordinals: Vec<u8>) -> Result<Self> {
        Self::from_ordinals(&ordinals)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.ordinals()
    }
}

/// Values assumed when a schedule omits a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDefaults {
    /// Default: Monday–Friday.
    pub working_days: WeekdaySet,
    /// Default: 8 (08:00).
    pub start_hour: u32,
    /// Default: 17 (exclusive, last slot starts before 17:00).
    pub end_hour: u32,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            working_days: WeekdaySet::WEEKDAYS,
            start_hour: 8,
            end_hour: 17,
        }
    }
}

/// A one-off exclusion interval. Both endpoints are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Break {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at <= self.end_time
    }
}

/// Resolved recurring availability for one expert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertSchedule {
    pub working_days: WeekdaySet,
    /// First bookable hour (inclusive).
    pub start_hour: u32,
    /// End of the working window (exclusive).
    pub end_hour: u32,
    pub breaks: Vec<Break>,
}

impl Default for ExpertSchedule {
    fn default() -> Self {
        Self::from_defaults(&ScheduleDefaults::default())
    }
}

impl ExpertSchedule {
    /// A schedule with no breaks, taken entirely from `defaults`.
    pub fn from_defaults(defaults: &ScheduleDefaults) -> Self {
        Self {
            working_days: defaults.working_days,
            start_hour: defaults.start_hour,
            end_hour: defaults.end_hour,
            breaks: Vec::new(),
        }
    }

    pub fn with_break(mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        self.breaks.push(Break::new(start_time, end_time));
        self
    }

    /// Parse backend JSON and fill missing fields from `defaults`.
    pub fn from_json(json: &str, defaults: &ScheduleDefaults) -> Result<Self> {
        let input: ScheduleInput = serde_json::from_str(json)?;
        input.resolve(defaults)
    }

    /// First break containing `at`, if any.
    pub fn break_at(&self, at: DateTime<Utc>) -> Option<&Break> {
        self.breaks.iter().find(|b| b.contains(at))
    }

    /// Check hour bounds and break ordering.
    ///
    /// # Errors
    /// `SlotError::InvalidHours` unless `start_hour < end_hour <= 24`;
    /// `SlotError::InvalidBreak` for a break ending before it starts.
    pub fn check(&self) -> Result<()> {
        if self.start_hour > 23 || self.end_hour > 24 || self.start_hour >= self.end_hour {
            return Err(SlotError::InvalidHours {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        if let Some(b) = self.breaks.iter().find(|b| b.end_time < b.start_time) {
            return Err(SlotError::InvalidBreak {
                start: b.start_time,
                end: b.end_time,
            });
        }
        Ok(())
    }
}

/// Schedule as sourced from the expert profile API. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[serde(default)]
    pub working_days: Option<Vec<u8>>,
    #[serde(default)]
    pub start_hour: Option<u32>,
    #[serde(default)]
    pub end_hour: Option<u32>,
    #[serde(default)]
    pub breaks: Vec<Break>,
}

impl ScheduleInput {
    /// Fill absent fields from `defaults` and check the result.
    pub fn resolve(self, defaults: &ScheduleDefaults) -> Result<ExpertSchedule> {
        let working_days = match self.working_days {
            Some(ordinals) => WeekdaySet::from_ordinals(&ordinals)?,
            None => defaults.working_days,
        };
        let schedule = ExpertSchedule {
            working_days,
            start_hour: self.start_hour.unwrap_or(defaults.start_hour),
            end_hour: self.end_hour.unwrap_or(defaults.end_hour),
            breaks: self.breaks,
        };
        schedule.check()?;
        Ok(schedule)
    }
}
