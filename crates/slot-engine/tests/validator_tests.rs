//! Tests for single-timestamp validation.
//!
//! The clock is pinned to Monday 2025-01-06 10:00 in Ho Chi Minh City (the
//! default policy zone) unless a test says otherwise.

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Asia::Ho_Chi_Minh;
use slot_engine::{
    BookingPolicy, ExpertSchedule, FixedClock, Locale, Rejection, Rule, SlotEngine, WeekdaySet,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// A local Ho Chi Minh City wall-clock time as an absolute instant.
fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Ho_Chi_Minh
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn monday_ten() -> DateTime<Utc> {
    local(2025, 1, 6, 10, 0)
}

fn engine() -> SlotEngine<FixedClock> {
    SlotEngine::with_clock(FixedClock::new(monday_ten()), BookingPolicy::default())
}

fn engine_with(policy: BookingPolicy) -> SlotEngine<FixedClock> {
    SlotEngine::with_clock(FixedClock::new(monday_ten()), policy)
}

// ── Time rules ──────────────────────────────────────────────────────────────

#[test]
fn now_itself_is_in_the_past() {
    let result = engine().validate(monday_ten(), None);
    assert!(!result.is_valid);
    assert_eq!(result.reason, Some(Rejection::InPast));
}

#[test]
fn earlier_time_is_in_the_past() {
    let result = engine().validate(local(2025, 1, 3, 9, 0), Some(&ExpertSchedule::default()));
    assert_eq!(result.rule(), Some(Rule::NotInPast));
}

#[test]
fn inside_lead_time_rejected() {
    let result = engine().validate(local(2025, 1, 6, 11, 0), Some(&ExpertSchedule::default()));
    assert!(!result.is_valid);
    assert_eq!(
        result.reason,
        Some(Rejection::InsufficientLeadTime {
            lead_time_minutes: 120
        })
    );
    assert_eq!(result.message, "Vui lòng đặt lịch trước ít nhất 2 giờ");
}

#[test]
fn exactly_lead_time_accepted() {
    let result = engine().validate(local(2025, 1, 6, 12, 0), Some(&ExpertSchedule::default()));
    assert!(result.is_valid, "{}", result.message);
}

#[test]
fn one_second_short_of_lead_time_rejected() {
    let at = monday_ten() + Duration::hours(2) - Duration::seconds(1);
    let result = engine().validate(at, None);
    assert_eq!(result.rule(), Some(Rule::MinimumLeadTime));
}

#[test]
fn exactly_horizon_accepted() {
    let at = monday_ten() + Duration::days(30);
    assert!(engine().validate(at, None).is_valid);
}

#[test]
fn beyond_horizon_rejected() {
    let at = monday_ten() + Duration::days(30) + Duration::minutes(1);
    let result = engine().validate(at, None);
    assert_eq!(
        result.reason,
        Some(Rejection::BeyondHorizon { horizon_days: 30 })
    );
    assert_eq!(result.message, "Chỉ có thể đặt lịch trong vòng 30 ngày tới");
}

#[test]
fn without_schedule_only_time_rules_apply() {
    // Saturday at 21:15: wrong day, hour and minute for any default schedule.
    let result = engine().validate(local(2025, 1, 11, 21, 15), None);
    assert!(result.is_valid);
    assert_eq!(result.reason, None);
    assert_eq!(result.message, "Thời gian hợp lệ");
}

// ── Schedule rules ──────────────────────────────────────────────────────────

#[test]
fn afternoon_same_day_accepted() {
    let result = engine().validate(local(2025, 1, 6, 13, 0), Some(&ExpertSchedule::default()));
    assert!(result.is_valid);
}

#[test]
fn saturday_rejected_by_default_schedule() {
    let result = engine().validate(local(2025, 1, 11, 9, 0), Some(&ExpertSchedule::default()));
    assert_eq!(result.reason, Some(Rejection::NonWorkingDay { weekday: 6 }));
    assert_eq!(result.message, "Chuyên gia không làm việc vào ngày này");
}

#[test]
fn sunday_rejected_by_default_schedule() {
    let result = engine().validate(local(2025, 1, 12, 10, 0), Some(&ExpertSchedule::default()));
    assert_eq!(result.reason, Some(Rejection::NonWorkingDay { weekday: 0 }));
}

#[test]
fn weekend_expert_accepts_saturday() {
    let schedule = ExpertSchedule {
        working_days: WeekdaySet::from_ordinals(&[0, 6]).unwrap(),
        ..ExpertSchedule::default()
    };
    assert!(engine().validate(local(2025, 1, 11, 9, 0), Some(&schedule)).is_valid);
    assert_eq!(
        engine().validate(local(2025, 1, 7, 9, 0), Some(&schedule)).rule(),
        Some(Rule::WorkingDay)
    );
}

#[test]
fn end_hour_is_exclusive() {
    let schedule = ExpertSchedule::default();
    let at_five = engine().validate(local(2025, 1, 7, 17, 0), Some(&schedule));
    assert_eq!(
        at_five.reason,
        Some(Rejection::OutsideWorkingHours {
            start_hour: 8,
            end_hour: 17
        })
    );
    assert!(engine().validate(local(2025, 1, 7, 16, 30), Some(&schedule)).is_valid);
}

#[test]
fn start_hour_is_inclusive() {
    let schedule = ExpertSchedule::default();
    assert!(engine().validate(local(2025, 1, 7, 8, 0), Some(&schedule)).is_valid);
    assert_eq!(
        engine().validate(local(2025, 1, 7, 7, 30), Some(&schedule)).rule(),
        Some(Rule::WorkingHours)
    );
}

#[test]
fn only_half_hour_marks_accepted() {
    let schedule = ExpertSchedule::default();
    let e = engine();
    assert!(e.validate(local(2025, 1, 7, 9, 0), Some(&schedule)).is_valid);
    assert!(e.validate(local(2025, 1, 7, 9, 30), Some(&schedule)).is_valid);
    let quarter = e.validate(local(2025, 1, 7, 9, 15), Some(&schedule));
    assert_eq!(
        quarter.reason,
        Some(Rejection::OffSlotBoundary {
            interval_minutes: 30
        })
    );
}

#[test]
fn break_interval_is_inclusive() {
    let schedule = ExpertSchedule::default()
        .with_break(local(2025, 1, 7, 12, 0), local(2025, 1, 7, 13, 0));
    let e = engine();

    let inside = e.validate(local(2025, 1, 7, 12, 30), Some(&schedule));
    assert_eq!(inside.rule(), Some(Rule::BreakOverlap));
    assert_eq!(inside.message, "Chuyên gia có lịch nghỉ vào thời gian này");

    assert_eq!(
        e.validate(local(2025, 1, 7, 12, 0), Some(&schedule)).rule(),
        Some(Rule::BreakOverlap)
    );
    assert_eq!(
        e.validate(local(2025, 1, 7, 13, 0), Some(&schedule)).rule(),
        Some(Rule::BreakOverlap)
    );
    assert!(e.validate(local(2025, 1, 7, 13, 30), Some(&schedule)).is_valid);
    assert!(e.validate(local(2025, 1, 7, 11, 30), Some(&schedule)).is_valid);
}

#[test]
fn break_on_another_day_does_not_apply() {
    let schedule = ExpertSchedule::default()
        .with_break(local(2025, 1, 8, 12, 0), local(2025, 1, 8, 13, 0));
    assert!(engine().validate(local(2025, 1, 7, 12, 30), Some(&schedule)).is_valid);
}

// ── Rule order ──────────────────────────────────────────────────────────────

#[test]
fn first_failing_rule_decides_reason() {
    let schedule = ExpertSchedule::default();
    // Saturday 17:15 fails day, hour and minute; the day rule runs first.
    let result = engine().validate(local(2025, 1, 11, 17, 15), Some(&schedule));
    assert_eq!(result.rule(), Some(Rule::WorkingDay));

    // Tuesday 18:15 fails hour and minute; hours run before granularity.
    let result = engine().validate(local(2025, 1, 7, 18, 15), Some(&schedule));
    assert_eq!(result.rule(), Some(Rule::WorkingHours));
}

#[test]
fn lead_time_wins_over_schedule_rules() {
    // 11:15 today is off-grid and too soon; lead time is reported.
    let result = engine().validate(local(2025, 1, 6, 11, 15), Some(&ExpertSchedule::default()));
    assert_eq!(result.rule(), Some(Rule::MinimumLeadTime));
}

// ── Policy and locale ───────────────────────────────────────────────────────

#[test]
fn english_messages() {
    let e = engine_with(BookingPolicy::default().with_locale(Locale::English));
    let result = e.validate(local(2025, 1, 11, 9, 0), Some(&ExpertSchedule::default()));
    assert_eq!(result.message, "The expert does not work on Saturdays");
    let ok = e.validate(local(2025, 1, 7, 9, 0), Some(&ExpertSchedule::default()));
    assert_eq!(ok.message, "The selected time is available");
}

#[test]
fn custom_lead_time_and_horizon() {
    let policy = BookingPolicy {
        lead_time_minutes: 30,
        horizon_days: 7,
        ..BookingPolicy::default()
    };
    let e = engine_with(policy);
    assert!(e.validate(local(2025, 1, 6, 10, 30), None).is_valid);
    assert_eq!(
        e.validate(local(2025, 1, 6, 10, 29), None).reason,
        Some(Rejection::InsufficientLeadTime {
            lead_time_minutes: 30
        })
    );
    assert_eq!(
        e.validate(local(2025, 1, 14, 9, 0), None).rule(),
        Some(Rule::MaximumHorizon)
    );
}

#[test]
fn local_fields_follow_policy_timezone() {
    // 09:00 in Berlin is 15:00 in Ho Chi Minh City; same instant, different verdicts.
    let at = Utc.with_ymd_and_hms(2025, 1, 7, 8, 0, 0).unwrap();
    let schedule = ExpertSchedule {
        end_hour: 12,
        ..ExpertSchedule::default()
    };
    let berlin = engine_with(BookingPolicy::default().with_timezone_name("Europe/Berlin").unwrap());
    assert!(berlin.validate(at, Some(&schedule)).is_valid);
    assert_eq!(
        engine().validate(at, Some(&schedule)).rule(),
        Some(Rule::WorkingHours)
    );
}

#[test]
fn result_serializes_for_the_front_end() {
    let result = engine().validate(local(2025, 1, 11, 9, 0), Some(&ExpertSchedule::default()));
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["isValid"], false);
    assert_eq!(json["reason"]["code"], "nonWorkingDay");
    assert_eq!(json["reason"]["weekday"], 6);
}
