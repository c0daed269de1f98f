use crate::level::Level;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Normalized record shipped to the log collector, serialized as one JSON
/// object per line.
///
/// Built once per log call by [`build_event`](crate::builder::build_event)
/// and not mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub level: Level,
    /// Timestamp of the source entry, passed through unchanged, offset
    /// included.
    pub time: DateTime<FixedOffset>,
    pub info: EventInfo,
    pub data: EventData,
    /// Classified message payload, see [`classify`](crate::classify::classify).
    pub message: Box<RawValue>,
    pub is_structured: bool,
    pub was_unquoted: bool,
}

impl Event {
    /// Serialize to a single line of JSON, without the trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, self)
    }
}

/// Metadata block of an [`Event`]. Every member is omitted from the output
/// when empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// Caller description, empty when it could not be resolved.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub pid: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub uid: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub gid: u32,
    /// Errors pulled out of the fields, in scan order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EventError>,
}

impl fmt::Display for EventInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, self)
    }
}

/// One error captured from the fields of a log call.
#[derive(Clone, Serialize)]
pub struct EventError {
    #[serde(rename = "type")]
    pub type_name: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<i32>,
    /// Kept for in-process inspection only.
    #[serde(skip)]
    pub original: Option<Arc<dyn Error + Send + Sync>>,
}

impl PartialEq for EventError {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.error == other.error && self.errno == other.errno
    }
}

impl fmt::Debug for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventError")
            .field("type", &self.type_name)
            .field("error", &self.error)
            .field("errno", &self.errno)
            .finish()
    }
}

/// Non-error fields of a log call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventData(pub BTreeMap<String, serde_json::Value>);

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge several maps into a new one. Later maps win on key collisions.
    pub fn merged<'a>(maps: impl IntoIterator<Item = &'a EventData>) -> EventData {
        let mut out = EventData::new();
        for map in maps {
            out.0
                .extend(map.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, self)
    }
}

impl FromIterator<(String, serde_json::Value)> for EventData {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        EventData(iter.into_iter().collect())
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn write_json<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    let text = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        Event {
            level: Level::Info,
            time: DateTime::parse_from_rfc3339("2024-05-01T14:30:00+02:00").unwrap(),
            info: EventInfo::default(),
            data: EventData::new(),
            message: serde_json::from_str(r#"{"string":"hi"}"#).unwrap(),
            is_structured: false,
            was_unquoted: false,
        }
    }

    #[test]
    fn serializes_top_level_keys_in_order() {
        let s = sample().to_string();
        assert_eq!(
            s,
            r#"{"level":"INFO","time":"2024-05-01T14:30:00+02:00","info":{},"data":{},"message":{"string":"hi"},"is_structured":false,"was_unquoted":false}"#
        );
    }

    #[test]
    fn info_omits_empty_members() {
        let info = EventInfo {
            source: "main.rs:main:3".to_string(),
            pid: 7,
            ..EventInfo::default()
        };
        assert_eq!(info.to_string(), r#"{"source":"main.rs:main:3","pid":7}"#);
    }

    #[test]
    fn event_error_skips_original_and_missing_errno() {
        let err = EventError {
            type_name: "std::io::error::Error".to_string(),
            error: "EOF".to_string(),
            errno: None,
            original: None,
        };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v, json!({"type": "std::io::error::Error", "error": "EOF"}));

        let err = EventError { errno: Some(2), ..err };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["errno"], json!(2));
    }

    #[test]
    fn merged_data_prefers_later_maps() {
        let a: EventData = [("x".to_string(), json!(1)), ("y".to_string(), json!(2))]
            .into_iter()
            .collect();
        let b: EventData = [("y".to_string(), json!("two"))].into_iter().collect();

        let m = EventData::merged([&a, &b]);
        assert_eq!(m.to_string(), r#"{"x":1,"y":"two"}"#);
        assert_eq!(a.len(), 2);
    }
}
