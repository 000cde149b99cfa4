//! Slot validation and enumeration against an injected clock and policy.
//!
//! [`SlotEngine::validate`] checks one timestamp; [`SlotEngine::enumerate_slots`]
//! walks a window of local calendar days and keeps every half-hour candidate the
//! same rule pipeline accepts, so both paths share one definition of "bookable".

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::format;
use crate::messages;
use crate::policy::BookingPolicy;
use crate::rules::{self, Rejection, Rule, RuleContext};
use crate::schedule::ExpertSchedule;

/// Default number of days [`SlotEngine::enumerate_slots`] searches.
pub const DEFAULT_SEARCH_DAYS: u32 = 7;

/// Outcome of validating one appointment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Localized, ready to show to the user.
    pub message: String,
    /// `None` when valid.
    pub reason: Option<Rejection>,
}

impl ValidationResult {
    pub fn rule(&self) -> Option<Rule> {
        self.reason.as_ref().map(Rejection::rule)
    }
}

/// A bookable appointment start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub time: DateTime<Utc>,
    pub display: String,
}

/// Validates and enumerates appointment slots.
#[derive(Debug, Clone)]
pub struct SlotEngine<C = SystemClock> {
    clock: C,
    policy: BookingPolicy,
}

impl SlotEngine<SystemClock> {
    pub fn new(policy: BookingPolicy) -> Self {
        Self::with_clock(SystemClock, policy)
    }
}

impl Default for SlotEngine<SystemClock> {
    fn default() -> Self {
        Self::new(BookingPolicy::default())
    }
}

impl<C: Clock> SlotEngine<C> {
    pub fn with_clock(clock: C, policy: BookingPolicy) -> Self {
        Self { clock, policy }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Decide whether `at` is bookable.
    ///
    /// Without a schedule only the past, lead-time and horizon rules apply.
    /// Never fails: every violation is reported through the result.
    pub fn validate(&self, at: DateTime<Utc>, schedule: Option<&ExpertSchedule>) -> ValidationResult {
        let now = self.clock.now();
        let locale = self.policy.locale;
        match self.check(at, schedule, now) {
            None => ValidationResult {
                is_valid: true,
                message: messages::confirmation(locale),
                reason: None,
            },
            Some(reason) => {
                debug!(rule = reason.rule().name(), %at, %now, "appointment time rejected");
                ValidationResult {
                    is_valid: false,
                    message: messages::rejection(locale, &reason),
                    reason: Some(reason),
                }
            }
        }
    }

    /// Every bookable slot over `days` local calendar days from `start_date`
    /// (today when `None`), in chronological order.
    pub fn enumerate_slots(
        &self,
        schedule: &ExpertSchedule,
        start_date: Option<NaiveDate>,
        days: u32,
    ) -> Vec<Slot> {
        let now = self.clock.now();
        let tz = self.policy.timezone;
        let today = now.with_timezone(&tz).date_naive();
        let start = start_date.unwrap_or(today);

        // Nothing past the horizon can validate, so the walk stops there.
        let Some(last_date) = self
            .policy
            .latest_bookable(now)
            .map(|latest| latest.with_timezone(&tz).date_naive())
        else {
            debug!(%now, horizon_days = self.policy.horizon_days, "horizon out of range");
            return Vec::new();
        };
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        let mut slots = Vec::new();
        for date in start
            .max(today)
            .iter_days()
            .take_while(|date| *date < end && *date <= last_date)
        {
            if !schedule.working_days.contains(date.weekday()) {
                continue;
            }
            for hour in schedule.start_hour..schedule.end_hour {
                for minute in self.policy.minute_marks() {
                    let Some(candidate) = self.local_instant(date, hour, minute) else {
                        trace!(%date, hour, minute, "local time skipped by DST transition");
                        continue;
                    };
                    if self.check(candidate, Some(schedule), now).is_none() {
                        slots.push(Slot {
                            time: candidate,
                            display: self.format(candidate),
                        });
                    }
                }
            }
        }

        debug!(%start, days, found = slots.len(), "enumerated appointment slots");
        slots
    }

    /// The earliest slot [`enumerate_slots`](Self::enumerate_slots) would return.
    pub fn first_available(
        &self,
        schedule: &ExpertSchedule,
        start_date: Option<NaiveDate>,
        days: u32,
    ) -> Option<Slot> {
        self.enumerate_slots(schedule, start_date, days)
            .into_iter()
            .next()
    }

    /// Long-form local display string in the policy's zone and locale.
    pub fn format(&self, at: DateTime<Utc>) -> String {
        format::format_local(at, self.policy.timezone, self.policy.locale)
    }

    /// Parse and format; returns [`format::INVALID_DATE`] on bad input.
    pub fn format_str(&self, input: &str) -> String {
        format::format_str(input, self.policy.timezone, self.policy.locale)
    }

    fn check(
        &self,
        at: DateTime<Utc>,
        schedule: Option<&ExpertSchedule>,
        now: DateTime<Utc>,
    ) -> Option<Rejection> {
        rules::first_rejection(&RuleContext {
            at,
            now,
            policy: &self.policy,
            schedule,
        })
    }

    fn local_instant(&self, date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        self.policy
            .timezone
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Slots that share a local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

/// Bucket chronologically ordered slots by local date in `tz`.
pub fn group_by_day(slots: &[Slot], tz: chrono_tz::Tz) -> Vec<DaySlots> {
    let mut days: Vec<DaySlots> = Vec::new();
    for slot in slots {
        let date = slot.time.with_timezone(&tz).date_naive();
        match days.last_mut() {
            Some(day) if day.date == date => day.slots.push(slot.clone()),
            _ => days.push(DaySlots {
                date,
                slots: vec![slot.clone()],
            }),
        }
    }
    days
}
