//! WASM bindings for slot-engine.
//!
//! Exposes appointment validation, slot listing and display formatting to the
//! booking form via `wasm-bindgen`. Schedules, policies and results cross the
//! boundary as JSON strings in the same camelCase shapes the backend API uses.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use slot_engine::{
    parse_datetime, BookingPolicy, Clock, ExpertSchedule, SlotEngine, SystemClock,
    DEFAULT_SEARCH_DAYS,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers shared by the exports (plain `String` errors so they run natively)
// ---------------------------------------------------------------------------

fn load_engine(policy_json: Option<&str>) -> Result<SlotEngine<SystemClock>, String> {
    Ok(SlotEngine::new(load_policy(policy_json)?))
}

fn load_policy(policy_json: Option<&str>) -> Result<BookingPolicy, String> {
    match policy_json {
        Some(json) => {
            BookingPolicy::from_json(json).map_err(|e| format!("Invalid policy JSON: {}", e))
        }
        None => Ok(BookingPolicy::default()),
    }
}

fn load_schedule(schedule_json: Option<&str>, policy: &BookingPolicy) -> Result<ExpertSchedule, String> {
    match schedule_json {
        Some(json) => ExpertSchedule::from_json(json, &policy.schedule_defaults)
            .map_err(|e| format!("Invalid schedule JSON: {}", e)),
        None => Ok(ExpertSchedule::from_defaults(&policy.schedule_defaults)),
    }
}

fn parse_start_date(start_date: Option<&str>) -> Result<Option<NaiveDate>, String> {
    start_date
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| format!("Invalid start date '{}': {}", s, e))
        })
        .transpose()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn validate_json<C: Clock>(
    engine: &SlotEngine<C>,
    at: &str,
    schedule_json: Option<&str>,
) -> Result<String, String> {
    let at = parse_datetime(at, engine.policy().timezone).map_err(|e| e.to_string())?;
    let schedule = match schedule_json {
        Some(json) => Some(load_schedule(Some(json), engine.policy())?),
        None => None,
    };
    to_json(&engine.validate(at, schedule.as_ref()))
}

fn slots_json<C: Clock>(
    engine: &SlotEngine<C>,
    schedule_json: Option<&str>,
    start_date: Option<&str>,
    days: Option<u32>,
) -> Result<String, String> {
    let schedule = load_schedule(schedule_json, engine.policy())?;
    let start = parse_start_date(start_date)?;
    let slots = engine.enumerate_slots(&schedule, start, days.unwrap_or(DEFAULT_SEARCH_DAYS));
    to_json(&slots)
}

fn next_slot_json<C: Clock>(
    engine: &SlotEngine<C>,
    schedule_json: Option<&str>,
    start_date: Option<&str>,
    days: Option<u32>,
) -> Result<String, String> {
    let schedule = load_schedule(schedule_json, engine.policy())?;
    let start = parse_start_date(start_date)?;
    let slot = engine.first_available(&schedule, start, days.unwrap_or(DEFAULT_SEARCH_DAYS));
    to_json(&slot)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check whether an appointment time is bookable.
///
/// Returns a JSON string `{isValid, message, reason}`; `reason` is `null` when
/// valid, otherwise an object tagged by `code` (e.g. `"insufficientLeadTime"`).
///
/// # Arguments
/// - `at` -- RFC 3339 datetime, or local `YYYY-MM-DDTHH:MM` in the policy zone
/// - `schedule_json` -- Expert schedule; only the time rules apply when omitted
/// - `policy_json` -- Optional partial `BookingPolicy`
#[wasm_bindgen(js_name = "validateAppointment")]
pub fn validate_appointment(
    at: &str,
    schedule_json: Option<String>,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = load_engine(policy_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    validate_json(&engine, at, schedule_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// List every bookable slot as a JSON array of `{time, display}` objects.
///
/// `start_date` is `YYYY-MM-DD` (defaults to today) and `days` defaults to 7.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(
    schedule_json: Option<String>,
    start_date: Option<String>,
    days: Option<u32>,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = load_engine(policy_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    slots_json(
        &engine,
        schedule_json.as_deref(),
        start_date.as_deref(),
        days,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// The earliest bookable slot as a `{time, display}` JSON object, or `null`.
#[wasm_bindgen(js_name = "nextAvailableSlot")]
pub fn next_available_slot(
    schedule_json: Option<String>,
    start_date: Option<String>,
    days: Option<u32>,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = load_engine(policy_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    next_slot_json(
        &engine,
        schedule_json.as_deref(),
        start_date.as_deref(),
        days,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Long-form localized display string. Unparseable datetimes yield `"Invalid Date"`.
#[wasm_bindgen(js_name = "formatAppointment")]
pub fn format_appointment(at: &str, policy_json: Option<String>) -> Result<String, JsValue> {
    let engine = load_engine(policy_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    Ok(engine.format_str(at))
}
