//! Booking policy: the tunable constants behind the validation rules.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::messages::Locale;
use crate::schedule::ScheduleDefaults;

/// Upper bound on [`BookingPolicy::horizon_days`], roughly ten years.
pub const MAX_HORIZON_DAYS: i64 = 3650;

/// Booking constraints shared by every expert.
///
/// All fields have defaults, so a policy file only needs the values it changes:
///
/// ```
/// use slot_engine::BookingPolicy;
///
/// let policy = BookingPolicy::from_json(r#"{"leadTimeMinutes": 60}"#).unwrap();
/// assert_eq!(policy.lead_time_minutes, 60);
/// assert_eq!(policy.horizon_days, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPolicy {
    /// Minimum gap between now and a bookable appointment. Default: 120.
    pub lead_time_minutes: i64,
    /// Furthest a slot may be booked into the future. Default: 30.
    pub horizon_days: i64,
    /// Slot granularity; must divide 60. Default: 30 (minutes :00 and :30).
    pub slot_interval_minutes: u32,
    /// Zone whose calendar fields the working-day/hour rules read.
    /// Default: `Asia/Ho_Chi_Minh`.
    pub timezone: Tz,
    /// Default: Vietnamese.
    pub locale: Locale,
    /// Fallbacks for schedule fields the expert profile omits.
    pub schedule_defaults: ScheduleDefaults,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            lead_time_minutes: 120,
            horizon_days: 30,
            slot_interval_minutes: 30,
            timezone: chrono_tz::Asia::Ho_Chi_Minh,
            locale: Locale::default(),
            schedule_defaults: ScheduleDefaults::default(),
        }
    }
}

impl BookingPolicy {
    /// Parse a (possibly partial) JSON policy and check it.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: BookingPolicy = serde_json::from_str(json)?;
        policy.check()?;
        Ok(policy)
    }

    /// Replace the zone by IANA name.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if `name` is not a known IANA zone.
    pub fn with_timezone_name(mut self, name: &str) -> Result<Self> {
        self.timezone = name
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(name.to_string()))?;
        Ok(self)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Reject policies the rules cannot evaluate meaningfully.
    pub fn check(&self) -> Result<()> {
        if self.lead_time_minutes < 0 {
            return Err(SlotError::InvalidPolicy(format!(
                "leadTimeMinutes must not be negative, got {}",
                self.lead_time_minutes
            )));
        }
        if self.horizon_days <= 0 || self.horizon_days > MAX_HORIZON_DAYS {
            return Err(SlotError::InvalidPolicy(format!(
                "horizonDays must be between 1 and {}, got {}",
                MAX_HORIZON_DAYS, self.horizon_days
            )));
        }
        if self.lead_time_minutes > self.horizon_days * 24 * 60 {
            return Err(SlotError::InvalidPolicy(format!(
                "leadTimeMinutes must not exceed the horizon ({} days), got {}",
                self.horizon_days, self.lead_time_minutes
            )));
        }
        if self.slot_interval_minutes == 0 || 60 % self.slot_interval_minutes != 0 {
            return Err(SlotError::InvalidPolicy(format!(
                "slotIntervalMinutes must divide 60, got {}",
                self.slot_interval_minutes
            )));
        }
        Ok(())
    }

    /// `None` if the value does not fit a `Duration`.
    pub fn lead_time(&self) -> Option<Duration> {
        Duration::try_minutes(self.lead_time_minutes)
    }

    /// `None` if the value does not fit a `Duration`.
    pub fn horizon(&self) -> Option<Duration> {
        Duration::try_days(self.horizon_days)
    }

    /// First instant the lead time allows, or `None` on overflow.
    pub fn earliest_bookable(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_add_signed(self.lead_time()?)
    }

    /// Last instant the horizon allows, or `None` on overflow.
    pub fn latest_bookable(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_add_signed(self.horizon()?)
    }

    /// Minute marks within each hour at which slots start, e.g. `[0, 30]`.
    pub fn minute_marks(&self) -> impl Iterator<Item = u32> {
        let step = self.slot_interval_minutes.max(1);
        (0..60).step_by(step as usize)
    }
}
