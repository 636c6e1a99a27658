//! Display formatting for caller-supplied event instants.

use chrono::{DateTime, Local, Offset, TimeZone};
use serde_json::Value;

/// Display form of an instant that cannot be placed on the calendar.
pub const INVALID_TIMESTAMP: &str = "NaN/NaN/NaN NaN:NaN:NaN";

/// Largest magnitude, in epoch milliseconds, accepted as a calendar instant.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Formats epoch milliseconds as `YYYY/MM/DD HH:MM:SS` in host local time.
pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

/// Formats epoch milliseconds as `Y/MM/DD HH:MM:SS` in `tz`.
///
/// The year is a plain integer (`5`, `10000`, `-271821`); the other fields
/// are zero-padded to two digits. Every instant within
/// [`MAX_EPOCH_MILLIS`] of the epoch is formatted, including years beyond
/// chrono's calendar; anything further out yields [`INVALID_TIMESTAMP`].
pub fn format_timestamp_in<Tz: TimeZone>(millis: i64, tz: &Tz) -> String {
    if millis.abs() > MAX_EPOCH_MILLIS {
        return INVALID_TIMESTAMP.to_string();
    }
    let local = millis + i64::from(offset_seconds_at(millis, tz)) * 1000;
    let (year, month, day) = civil_from_days(local.div_euclid(MILLIS_PER_DAY));
    let secs_of_day = local.rem_euclid(MILLIS_PER_DAY) / 1000;
    format!(
        "{}/{:02}/{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        secs_of_day / 3600,
        secs_of_day % 3600 / 60,
        secs_of_day % 60
    )
}

/// 0001-01-01T00:00:00Z and 9999-12-31T23:59:59.999Z.
const OFFSET_LOOKUP_MILLIS: (i64, i64) = (-62_135_596_800_000, 253_402_300_799_999);

/// UTC offset of `tz` at `millis`. Instants outside years 1 to 9999 use the
/// offset at the nearest instant inside them.
fn offset_seconds_at<Tz: TimeZone>(millis: i64, tz: &Tz) -> i32 {
    let (lo, hi) = OFFSET_LOOKUP_MILLIS;
    match DateTime::from_timestamp_millis(millis.clamp(lo, hi)) {
        Some(utc) => tz
            .offset_from_utc_datetime(&utc.naive_utc())
            .fix()
            .local_minus_utc(),
        None => 0,
    }
}

/// Proleptic Gregorian `(year, month, day)` for days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Interprets the raw `timestamp` field of an event payload as epoch milliseconds.
///
/// Accepts JSON numbers (fraction truncated toward zero), numeric strings,
/// and RFC 3339 strings. `null` is the epoch and booleans are `0`/`1`,
/// as the browser-era service read them.
pub fn epoch_millis(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Null => Some(0),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(ms) => Some(ms),
            None => float_millis(n.as_f64()?),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Some(ms);
            }
            if let Ok(f) = s.parse::<f64>() {
                return float_millis(f);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis())
        }
        _ => None,
    }
}

fn float_millis(f: f64) -> Option<i64> {
    if !f.is_finite() || f.abs() > MAX_EPOCH_MILLIS as f64 {
        return None;
    }
    Some(f.trunc() as i64)
}

/// Formats the raw `timestamp` field in host local time.
pub fn format_event_timestamp(value: Option<&Value>) -> String {
    format_event_timestamp_in(value, &Local)
}

pub fn format_event_timestamp_in<Tz: TimeZone>(value: Option<&Value>, tz: &Tz) -> String {
    match epoch_millis(value) {
        Some(ms) => format_timestamp_in(ms, tz),
        None => INVALID_TIMESTAMP.to_string(),
    }
}
