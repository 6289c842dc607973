//! WASM bindings for the range-engine core.
//!
//! The rendering layer runs in the browser; these bindings expose the
//! engine's pure functions over JSON strings so the JS side can keep the
//! current `DateTimeRange` in its own state and thread it through every
//! call. Instants cross the boundary as RFC 3339 strings, constraints and
//! events as the engine's serde representations. No logic lives here —
//! only (de)serialization and error mapping to `JsError`.

use chrono::{DateTime, Utc};
use range_engine::{builtin_presets, Constraints, DateTimeRange, Event};
use wasm_bindgen::prelude::*;

fn parse_instant(s: &str) -> Result<DateTime<Utc>, JsError> {
    s.parse::<DateTime<Utc>>()
        .map_err(|e| JsError::new(&format!("invalid instant '{s}': {e}")))
}

fn parse_focus(s: Option<String>) -> Result<Option<DateTime<Utc>>, JsError> {
    s.as_deref().map(parse_instant).transpose()
}

/// Apply one UI event to the selection. `range`, `event`, and
/// `constraints` are JSON; `focused` is an optional RFC 3339 instant.
/// Returns the full transition result (next range, focus, violation code
/// plus display message, apply gate, commit flag) as JSON. Preset indices
/// resolve against the builtin catalog.
#[wasm_bindgen]
pub fn transition(
    range: &str,
    focused: Option<String>,
    event: &str,
    constraints: &str,
) -> Result<String, JsError> {
    let range: DateTimeRange = serde_json::from_str(range)?;
    let focused = parse_focus(focused)?;
    let event: Event = serde_json::from_str(event)?;
    let constraints: Constraints = serde_json::from_str(constraints)?;
    let presets = builtin_presets();
    let result = range_engine::transition(&range, focused, event, &presets, &constraints)?;
    let mut value = serde_json::to_value(&result)?;
    if let Some(violation) = result.violation {
        value["violation_message"] = serde_json::Value::String(violation.to_string());
    }
    Ok(serde_json::to_string(&value)?)
}

/// The instants of each calendar day of a zoned month, as a JSON array of
/// RFC 3339 strings (one local midnight per day).
#[wasm_bindgen]
pub fn month_days(year: i32, month: u32, timezone: &str) -> Result<String, JsError> {
    let days = range_engine::days_of(year, month, timezone)?;
    Ok(serde_json::to_string(&days)?)
}

/// Leading blank cells before the month's first day in a Monday-first
/// grid.
#[wasm_bindgen]
pub fn weekday_offset(first_day: &str, timezone: &str) -> Result<u32, JsError> {
    Ok(range_engine::weekday_offset(
        parse_instant(first_day)?,
        timezone,
    )?)
}

/// First violated rule of a range as JSON (`null` when valid).
#[wasm_bindgen]
pub fn validate(range: &str, constraints: &str) -> Result<String, JsError> {
    let range: DateTimeRange = serde_json::from_str(range)?;
    let constraints: Constraints = serde_json::from_str(constraints)?;
    let violation = range_engine::validate(&range, &constraints)?;
    Ok(serde_json::to_string(&violation)?)
}

/// Whether a day cell should be grayed out.
#[wasm_bindgen]
pub fn is_date_disabled(date: &str, constraints: &str, timezone: &str) -> Result<bool, JsError> {
    let constraints: Constraints = serde_json::from_str(constraints)?;
    Ok(range_engine::is_date_disabled(
        parse_instant(date)?,
        &constraints,
        timezone,
    )?)
}

/// Render an instant in a timezone with a strftime pattern.
#[wasm_bindgen]
pub fn format_instant(instant: &str, timezone: &str, pattern: &str) -> Result<String, JsError> {
    Ok(range_engine::format(
        parse_instant(instant)?,
        timezone,
        pattern,
    )?)
}

/// Offset metadata (UTC offset, DST flag, abbreviation) for the timezone
/// picker header, as JSON.
#[wasm_bindgen]
pub fn zone_info(instant: &str, timezone: &str) -> Result<String, JsError> {
    let info = range_engine::zone_info(parse_instant(instant)?, timezone)?;
    Ok(serde_json::to_string(&info)?)
}

/// Labels of the builtin preset catalog, in display order, as JSON.
#[wasm_bindgen]
pub fn preset_labels() -> Result<String, JsError> {
    let labels: Vec<String> = builtin_presets()
        .iter()
        .map(|p| p.label().to_string())
        .collect();
    Ok(serde_json::to_string(&labels)?)
}
