//! Localized user-facing text for validation outcomes.
//!
//! Rules produce typed [`Rejection`]s; this module is the only place that turns
//! them into strings. Vietnamese is the deployment default.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::rules::Rejection;

/// Display language for messages and formatted datetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "vi")]
    Vietnamese,
    #[serde(rename = "en")]
    English,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Vietnamese => "vi",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = SlotError;

    /// Accepts bare language codes and BCP 47 tags (`vi`, `vi-VN`, `en-US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.split(['-', '_']).next().unwrap_or_default();
        match lang.to_ascii_lowercase().as_str() {
            "vi" => Ok(Locale::Vietnamese),
            "en" => Ok(Locale::English),
            _ => Err(SlotError::InvalidLocale(s.to_string())),
        }
    }
}

/// Message shown when every rule passes.
pub fn confirmation(locale: Locale) -> String {
    match locale {
        Locale::Vietnamese => "Thời gian hợp lệ".to_string(),
        Locale::English => "The selected time is available".to_string(),
    }
}

/// Message shown for a failed rule.
pub fn rejection(locale: Locale, reason: &Rejection) -> String {
    match locale {
        Locale::Vietnamese => rejection_vi(reason),
        Locale::English => rejection_en(reason),
    }
}

fn rejection_vi(reason: &Rejection) -> String {
    match reason {
        Rejection::InPast => "Không thể đặt lịch hẹn trong quá khứ".to_string(),
        Rejection::InsufficientLeadTime { lead_time_minutes } => format!(
            "Vui lòng đặt lịch trước ít nhất {}",
            duration_vi(*lead_time_minutes)
        ),
        Rejection::BeyondHorizon { horizon_days } => {
            format!("Chỉ có thể đặt lịch trong vòng {} ngày tới", horizon_days)
        }
        Rejection::NonWorkingDay { .. } => {
            "Chuyên gia không làm việc vào ngày này".to_string()
        }
        Rejection::OutsideWorkingHours {
            start_hour,
            end_hour,
        } => format!(
            "Chỉ có thể đặt lịch trong giờ làm việc ({}:00 - {}:00)",
            start_hour, end_hour
        ),
        Rejection::OffSlotBoundary { interval_minutes } => format!(
            "Thời gian đặt lịch phải theo khung {} phút (ví dụ: 9:00, 9:{:02})",
            interval_minutes, interval_minutes
        ),
        Rejection::DuringBreak { .. } => {
            "Chuyên gia có lịch nghỉ vào thời gian này".to_string()
        }
    }
}

fn rejection_en(reason: &Rejection) -> String {
    match reason {
        Rejection::InPast => "Appointments cannot be booked in the past".to_string(),
        Rejection::InsufficientLeadTime { lead_time_minutes } => format!(
            "Appointments must be booked at least {} in advance",
            duration_en(*lead_time_minutes)
        ),
        Rejection::BeyondHorizon { horizon_days } => format!(
            "Appointments can only be booked within the next {} days",
            horizon_days
        ),
        Rejection::NonWorkingDay { weekday } => format!(
            "The expert does not work on {}",
            weekday_en(*weekday)
        ),
        Rejection::OutsideWorkingHours {
            start_hour,
            end_hour,
        } => format!(
            "Appointments must be within working hours ({}:00 - {}:00)",
            start_hour, end_hour
        ),
        Rejection::OffSlotBoundary { interval_minutes } => format!(
            "Appointments must start on a {}-minute boundary (e.g. 9:00, 9:{:02})",
            interval_minutes, interval_minutes
        ),
        Rejection::DuringBreak { .. } => "The expert is on a break at this time".to_string(),
    }
}

fn duration_vi(minutes: i64) -> String {
    if minutes % 60 == 0 {
        format!("{} giờ", minutes / 60)
    } else {
        format!("{} phút", minutes)
    }
}

fn duration_en(minutes: i64) -> String {
    match (minutes % 60, minutes / 60) {
        (0, 1) => "1 hour".to_string(),
        (0, h) => format!("{} hours", h),
        _ => format!("{} minutes", minutes),
    }
}

fn weekday_en(ordinal: u8) -> &'static str {
    match ordinal {
        0 => "Sundays",
        1 => "Mondays",
        2 => "Tuesdays",
        3 => "Wednesdays",
        4 => "Thursdays",
        5 => "Fridays",
        _ => "Saturdays",
    }
}

pub(crate) fn weekday_name(locale: Locale, weekday: Weekday) -> &'static str {
    match locale {
        Locale::Vietnamese => match weekday {
            Weekday::Sun => "Chủ Nhật",
            Weekday::Mon => "Thứ Hai",
            Weekday::Tue => "Thứ Ba",
            Weekday::Wed => "Thứ Tư",
            Weekday::Thu => "Thứ Năm",
            Weekday::Fri => "Thứ Sáu",
            Weekday::Sat => "Thứ Bảy",
        },
        Locale::English => match weekday {
            Weekday::Sun => "Sunday",
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
        },
    }
}
