//! Long-form, localized display strings for appointment times.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::messages::{self, Locale};

/// Returned by [`format_str`] when the input is not a datetime.
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Render `at` in `tz`'s local calendar.
///
/// - Vietnamese: `13:00 Thứ Hai, 6 tháng 1, 2025`
/// - English: `Monday, January 6, 2025 at 1:00 PM`
pub fn format_local(at: DateTime<Utc>, tz: Tz, locale: Locale) -> String {
    let local = at.with_timezone(&tz);
    match locale {
        Locale::Vietnamese => format!(
            "{:02}:{:02} {}, {} tháng {}, {}",
            local.hour(),
            local.minute(),
            messages::weekday_name(locale, local.weekday()),
            local.day(),
            local.month(),
            local.year()
        ),
        Locale::English => local.format("%A, %B %-d, %Y at %-I:%M %p").to_string(),
    }
}

/// Parse then format; never fails.
pub fn format_str(input: &str, tz: Tz, locale: Locale) -> String {
    match parse_datetime(input, tz) {
        Ok(at) => format_local(at, tz, locale),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// Parse an ISO 8601 datetime into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset, e.g. `2025-01-06T13:00:00+07:00`) and naive
/// local time (e.g. `2025-01-06T13:00`), which is read in `tz`. A naive time in a
/// DST fold resolves to the earlier instant.
///
/// # Errors
/// Returns `SlotError::InvalidDateTime` if no format matches or the local time
/// does not exist in `tz`.
pub fn parse_datetime(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| SlotError::InvalidDateTime {
            input: input.to_string(),
            reason: "expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]".to_string(),
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| SlotError::InvalidDateTime {
            input: input.to_string(),
            reason: format!("local time does not exist in {}", tz),
        })
}
