//! Payload POSTed by the API to a trigger's callback URL.
//!
//! The service is not consistent about field types across trigger kinds (a
//! threshold may arrive as `"30"` or `30`), so an event is kept as a map of
//! loosely typed values and callers ask for the type they need.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field of a trigger event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    /// Nested objects or arrays.
    Other(serde_json::Value),
}

impl EventValue {
    fn type_name(&self) -> &'static str {
        match self {
            EventValue::String(_) => "string",
            EventValue::Number(_) => "number",
            EventValue::Bool(_) => "bool",
            EventValue::Null => "null",
            EventValue::Other(_) => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventFieldError {
    #[error("trigger event has no `{0}` field")]
    Missing(String),

    #[error("trigger event field `{field}` is a {found}, expected a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A trigger-fired event, e.g.
///
/// ```json
/// { "feed_id": "a65689ce7a9a69291c6ed2deda1affad", "stream": "temperature",
///   "trigger_name": "foobar", "condition": ">", "threshold": "30",
///   "value": 31.5, "at": "2014-01-11T16:14:14Z" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerEvent(BTreeMap<String, EventValue>);

impl TriggerEvent {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn get(&self, field: &str) -> Option<&EventValue> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &EventValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn str_field(&self, field: &str) -> Result<&str, EventFieldError> {
        match self.require(field)? {
            EventValue::String(s) => Ok(s),
            other => Err(wrong_type(field, "string", other)),
        }
    }

    /// Numbers are returned as-is; numeric strings are parsed.
    pub fn f64_field(&self, field: &str) -> Result<f64, EventFieldError> {
        match self.require(field)? {
            EventValue::Number(n) => Ok(*n),
            value @ EventValue::String(s) => s
                .trim()
                .parse()
                .map_err(|_| wrong_type(field, "number", value)),
            other => Err(wrong_type(field, "number", other)),
        }
    }

    pub fn bool_field(&self, field: &str) -> Result<bool, EventFieldError> {
        match self.require(field)? {
            EventValue::Bool(b) => Ok(*b),
            other => Err(wrong_type(field, "bool", other)),
        }
    }

    pub fn feed_id(&self) -> Result<&str, EventFieldError> {
        self.str_field("feed_id")
    }

    pub fn stream(&self) -> Result<&str, EventFieldError> {
        self.str_field("stream")
    }

    pub fn trigger_name(&self) -> Result<&str, EventFieldError> {
        self.str_field("trigger_name")
    }

    pub fn condition(&self) -> Result<&str, EventFieldError> {
        self.str_field("condition")
    }

    pub fn threshold(&self) -> Result<f64, EventFieldError> {
        self.f64_field("threshold")
    }

    pub fn value(&self) -> Result<f64, EventFieldError> {
        self.f64_field("value")
    }

    pub fn at(&self) -> Result<&str, EventFieldError> {
        self.str_field("at")
    }

    fn require(&self, field: &str) -> Result<&EventValue, EventFieldError> {
        self.0
            .get(field)
            .ok_or_else(|| EventFieldError::Missing(field.to_string()))
    }
}

impl FromStr for TriggerEvent {
    type Err = serde_json::Error;

    fn from_str(body: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(body)
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &EventValue) -> EventFieldError {
    EventFieldError::WrongType {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "feed_id": "a65689ce7a9a69291c6ed2deda1affad",
        "stream": "temperature",
        "trigger_name": "foobar",
        "trigger_description": "temperature > 30",
        "condition": ">",
        "threshold": "30",
        "value": 31.5,
        "at": "2014-01-11T16:14:14Z"
    }"#;

    #[test]
    fn exposes_feed_id_under_same_key() {
        let event = EVENT.parse::<TriggerEvent>().unwrap();
        assert_eq!(
            event.get("feed_id"),
            Some(&EventValue::String("a65689ce7a9a69291c6ed2deda1affad".to_string()))
        );
        assert_eq!(event.feed_id().unwrap(), "a65689ce7a9a69291c6ed2deda1affad");
        assert_eq!(event.condition().unwrap(), ">");
        assert_eq!(event.trigger_name().unwrap(), "foobar");
    }

    #[test]
    fn numbers_and_numeric_strings_both_extract() {
        let event = EVENT.parse::<TriggerEvent>().unwrap();
        assert_eq!(event.threshold().unwrap(), 30.0);
        assert_eq!(event.value().unwrap(), 31.5);
    }

    #[test]
    fn tolerates_unknown_and_odd_fields() {
        let event = TriggerEvent::from_slice(
            br#"{"feed_id":"abc","threshold":30,"value":"31.5","extra":{"a":[1,2]},"gone":null,"on":true}"#,
        )
        .unwrap();
        assert_eq!(event.feed_id().unwrap(), "abc");
        assert_eq!(event.threshold().unwrap(), 30.0);
        assert_eq!(event.value().unwrap(), 31.5);
        assert!(matches!(event.get("extra"), Some(EventValue::Other(_))));
        assert_eq!(event.get("gone"), Some(&EventValue::Null));
        assert!(event.bool_field("on").unwrap());
        assert_eq!(event.fields().count(), 6);
    }

    #[test]
    fn extraction_errors_are_explicit() {
        let event = r#"{"feed_id":42,"condition":"high"}"#.parse::<TriggerEvent>().unwrap();
        assert_eq!(
            event.feed_id().unwrap_err(),
            EventFieldError::WrongType {
                field: "feed_id".to_string(),
                expected: "string",
                found: "number",
            }
        );
        assert_eq!(
            event.at().unwrap_err(),
            EventFieldError::Missing("at".to_string())
        );
        assert!(event.f64_field("condition").is_err());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!("[1,2,3]".parse::<TriggerEvent>().is_err());
    }
}
