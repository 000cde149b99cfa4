//! The ordered booking rules and their typed failure reasons.
//!
//! A timestamp is bookable iff every applicable rule in [`Rule::ORDER`] passes.
//! Evaluation stops at the first failure, whose [`Rejection`] is reported.
//! Rules after [`Rule::MaximumHorizon`] read the expert schedule and are
//! skipped when no schedule is given.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::policy::BookingPolicy;
use crate::schedule::ExpertSchedule;

/// A named booking rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    NotInPast,
    MinimumLeadTime,
    MaximumHorizon,
    WorkingDay,
    WorkingHours,
    SlotGranularity,
    BreakOverlap,
}

/// Why a timestamp is not bookable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Rejection {
    /// At or before now.
    InPast,
    /// Sooner than the required lead time.
    InsufficientLeadTime { lead_time_minutes: i64 },
    /// Further out than the booking horizon.
    BeyondHorizon { horizon_days: i64 },
    /// Local weekday (0=Sunday) is not a working day.
    NonWorkingDay { weekday: u8 },
    /// Local hour falls outside `[start_hour, end_hour)`.
    OutsideWorkingHours { start_hour: u32, end_hour: u32 },
    /// Local minute is not on a slot boundary.
    OffSlotBoundary { interval_minutes: u32 },
    /// Inside a break, endpoints included.
    DuringBreak {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl Rejection {
    /// The rule that produced this rejection.
    pub fn rule(&self) -> Rule {
        match self {
            Rejection::InPast => Rule::NotInPast,
            Rejection::InsufficientLeadTime { .. } => Rule::MinimumLeadTime,
            Rejection::BeyondHorizon { .. } => Rule::MaximumHorizon,
            Rejection::NonWorkingDay { .. } => Rule::WorkingDay,
            Rejection::OutsideWorkingHours { .. } => Rule::WorkingHours,
            Rejection::OffSlotBoundary { .. } => Rule::SlotGranularity,
            Rejection::DuringBreak { .. } => Rule::BreakOverlap,
        }
    }
}

/// Everything a rule may look at. `now` is captured once per evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub at: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub policy: &'a BookingPolicy,
    pub schedule: Option<&'a ExpertSchedule>,
}

impl RuleContext<'_> {
    fn local(&self) -> DateTime<Tz> {
        self.at.with_timezone(&self.policy.timezone)
    }
}

impl Rule {
    /// Evaluation order. The first failing rule decides the reported reason.
    pub const ORDER: [Rule; 7] = [
        Rule::NotInPast,
        Rule::MinimumLeadTime,
        Rule::MaximumHorizon,
        Rule::WorkingDay,
        Rule::WorkingHours,
        Rule::SlotGranularity,
        Rule::BreakOverlap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::NotInPast => "not_in_past",
            Rule::MinimumLeadTime => "minimum_lead_time",
            Rule::MaximumHorizon => "maximum_horizon",
            Rule::WorkingDay => "working_day",
            Rule::WorkingHours => "working_hours",
            Rule::SlotGranularity => "slot_granularity",
            Rule::BreakOverlap => "break_overlap",
        }
    }

    pub fn requires_schedule(self) -> bool {
        !matches!(
            self,
            Rule::NotInPast | Rule::MinimumLeadTime | Rule::MaximumHorizon
        )
    }

    /// `None` if the rule passes or does not apply.
    pub fn evaluate(self, ctx: &RuleContext<'_>) -> Option<Rejection> {
        let policy = ctx.policy;
        match self {
            Rule::NotInPast => (ctx.at <= ctx.now).then_some(Rejection::InPast),
            // An unrepresentable bound rejects rather than panics.
            Rule::MinimumLeadTime => policy
                .earliest_bookable(ctx.now)
                .is_none_or(|earliest| ctx.at < earliest)
                .then_some(Rejection::InsufficientLeadTime {
                    lead_time_minutes: policy.lead_time_minutes,
                }),
            Rule::MaximumHorizon => policy
                .latest_bookable(ctx.now)
                .is_none_or(|latest| ctx.at > latest)
                .then_some(Rejection::BeyondHorizon {
                    horizon_days: policy.horizon_days,
                }),
            Rule::WorkingDay => {
                let schedule = ctx.schedule?;
                let weekday = ctx.local().weekday();
                (!schedule.working_days.contains(weekday)).then(|| Rejection::NonWorkingDay {
                    weekday: weekday.num_days_from_sunday() as u8,
                })
            }
            Rule::WorkingHours => {
                let schedule = ctx.schedule?;
                let hour = ctx.local().hour();
                (hour < schedule.start_hour || hour >= schedule.end_hour).then_some(
                    Rejection::OutsideWorkingHours {
                        start_hour: schedule.start_hour,
                        end_hour: schedule.end_hour,
                    },
                )
            }
            Rule::SlotGranularity => {
                ctx.schedule?;
                let minute = ctx.local().minute();
                (minute % policy.slot_interval_minutes.max(1) != 0).then_some(
                    Rejection::OffSlotBoundary {
                        interval_minutes: policy.slot_interval_minutes,
                    },
                )
            }
            Rule::BreakOverlap => {
                let found = ctx.schedule?.break_at(ctx.at)?;
                Some(Rejection::DuringBreak {
                    start_time: found.start_time,
                    end_time: found.end_time,
                })
            }
        }
    }
}

/// Run the rules in [`Rule::ORDER`] and return the first rejection.
pub fn first_rejection(ctx: &RuleContext<'_>) -> Option<Rejection> {
    Rule::ORDER.iter().find_map(|rule| rule.evaluate(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx<'a>(
        at: DateTime<Utc>,
        now: DateTime<Utc>,
        policy: &'a BookingPolicy,
        schedule: Option<&'a ExpertSchedule>,
    ) -> RuleContext<'a> {
        RuleContext {
            at,
            now,
            policy,
            schedule,
        }
    }

    #[test]
    fn every_rejection_maps_back_to_its_rule() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let samples = [
            Rejection::InPast,
            Rejection::InsufficientLeadTime { lead_time_minutes: 120 },
            Rejection::BeyondHorizon { horizon_days: 30 },
            Rejection::NonWorkingDay { weekday: 0 },
            Rejection::OutsideWorkingHours { start_hour: 8, end_hour: 17 },
            Rejection::OffSlotBoundary { interval_minutes: 30 },
            Rejection::DuringBreak { start_time: t, end_time: t },
        ];
        let rules: Vec<Rule> = samples.iter().map(Rejection::rule).collect();
        assert_eq!(rules, Rule::ORDER.to_vec());
    }

    #[test]
    fn schedule_rules_skip_without_schedule() {
        let policy = BookingPolicy::default();
        // Sunday 03:15 local, far enough out to pass the time rules.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 4, 20, 15, 0).unwrap();
        let c = ctx(at, now, &policy, None);
        for rule in Rule::ORDER.iter().filter(|r| r.requires_schedule()) {
            assert_eq!(rule.evaluate(&c), None, "{} should not apply", rule.name());
        }
        assert_eq!(first_rejection(&c), None);
    }

    #[test]
    fn past_wins_over_later_failures() {
        let policy = BookingPolicy::default();
        let schedule = ExpertSchedule::default();
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 3, 0, 0).unwrap();
        // Earlier Sunday at an off-grid minute: several rules fail.
        let at = Utc.with_ymd_and_hms(2025, 1, 4, 20, 15, 0).unwrap();
        let c = ctx(at, now, &policy, Some(&schedule));
        assert_eq!(first_rejection(&c), Some(Rejection::InPast));
    }

    #[test]
    fn overflowing_bounds_reject_instead_of_panicking() {
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 3, 0, 0).unwrap();
        let at = now + chrono::Duration::hours(3);

        let huge_horizon = BookingPolicy {
            horizon_days: 1_000_000_000,
            ..BookingPolicy::default()
        };
        assert_eq!(
            first_rejection(&ctx(at, now, &huge_horizon, None)),
            Some(Rejection::BeyondHorizon {
                horizon_days: 1_000_000_000
            })
        );

        let huge_lead = BookingPolicy {
            lead_time_minutes: i64::MAX,
            ..BookingPolicy::default()
        };
        assert_eq!(
            first_rejection(&ctx(at, now, &huge_lead, None)).map(|r| r.rule()),
            Some(Rule::MinimumLeadTime)
        );
    }

    #[test]
    fn rejection_serializes_with_code_tag() {
        let json = serde_json::to_string(&Rejection::OutsideWorkingHours {
            start_hour: 8,
            end_hour: 17,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"code":"outsideWorkingHours","startHour":8,"endHour":17}"#
        );
    }
}
