//! Event records submitted by the storefront frontend.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::timestamp::format_event_timestamp_in;

/// Token written for a field the caller left out.
pub const MISSING_FIELD: &str = "undefined";

pub const FIELD_SEPARATOR: char = '|';

/// One user interaction as received from the browser.
///
/// Fields stay raw JSON: nothing is validated or coerced. A field that is
/// absent is `None`; an explicit JSON `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub route: Option<Value>,
    /// Accepted but never persisted.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub agent: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl EventRecord {
    /// Parses a request body. Anything that is not a JSON object becomes an
    /// empty record, so every field renders as [`MISSING_FIELD`].
    pub fn from_body(body: &[u8]) -> Self {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                tracing::warn!("Event payload is not an object, logging placeholders: {}", other);
                return EventRecord::default();
            }
            Err(e) => {
                tracing::warn!("Unreadable event payload, logging placeholders: {}", e);
                return EventRecord::default();
            }
        };
        // every field accepts any JSON value, so an object always fits
        serde_json::from_value(Value::Object(fields)).unwrap_or_default()
    }

    /// `timestamp|action|product|quantity|price|route\n` in host local time.
    pub fn to_log_line(&self) -> String {
        self.to_log_line_in(&Local)
    }

    pub fn to_log_line_in<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let fields = [
            format_event_timestamp_in(self.timestamp.as_ref(), tz),
            field_token(self.action.as_ref()),
            field_token(self.product.as_ref()),
            field_token(self.quantity.as_ref()),
            field_token(self.price.as_ref()),
            field_token(self.route.as_ref()),
        ];
        let mut line = fields.join("|");
        line.push('\n');
        line
    }

    /// Client user agent, if one was sent as a string.
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_ref().and_then(Value::as_str)
    }
}

/// Renders one raw field as a single-line, separator-free token.
pub fn field_token(value: Option<&Value>) -> String {
    let raw = match value {
        None => MISSING_FIELD.to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_token(n),
        Some(other) => other.to_string(),
    };
    sanitize(&raw)
}

fn number_token(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        // integral floats print without a fraction, like the browser does
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\r' | '\n' => ' ',
            FIELD_SEPARATOR => '/',
            other => other,
        })
        .collect()
}
