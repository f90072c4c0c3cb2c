//! Date handling for pharmacy API payloads.
//!
//! The API serializes `java.util.Date` and `LocalDate` fields differently
//! depending on its Jackson setup, so input is accepted as `YYYY-MM-DD`,
//! an ISO date-time, epoch milliseconds or a `[y, m, d]` array.
//! Output is always `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Interpret one JSON value as a calendar date
pub fn parse_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        Value::Array(parts) => {
            let year = parts.first()?.as_i64()?;
            let month = parts.get(1)?.as_u64()?;
            let day = parts.get(2)?.as_u64()?;
            NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        }
        _ => None,
    }
}

pub fn parse_str(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, WIRE_FORMAT).ok()
}

/// `dd/mm/yyyy`, the way dates are shown on every page
pub fn format_br(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// serde adapter for `Option<NaiveDate>` fields
pub mod lenient {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(v) => {
                let parsed = parse_value(&v);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unrecognised date value from backend: {}", v);
                }
                parsed
            }
        })
    }

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}
