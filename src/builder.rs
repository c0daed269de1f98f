use crate::classify::classify;
use crate::event::{Event, EventData, EventError, EventInfo};
use crate::field::{ErrorValue, FieldValue, Fields};
use crate::level::SourceLevel;
use crate::process::ProcessInfo;
use chrono::{DateTime, FixedOffset};

/// Build the event for one log call.
///
/// Error-valued fields are moved into `info.errors`, in key order, and left
/// out of `data`; every other field is copied into `data` unchanged. `fields`
/// itself is not modified. An unresolved `source` becomes an empty string.
/// `time` keeps whatever offset it was given.
pub fn build_event<L, T>(
    level: &L,
    message: &str,
    fields: &Fields,
    time: T,
    source: Option<&str>,
) -> Event
where
    L: SourceLevel + ?Sized,
    T: Into<DateTime<FixedOffset>>,
{
    let classified = classify(message);
    let (data, errors) = partition_fields(fields);

    Event {
        level: level.to_level(),
        time: time.into(),
        info: EventInfo {
            source: source.unwrap_or_default().to_string(),
            errors,
            ..EventInfo::default()
        },
        data,
        message: classified.payload,
        is_structured: classified.is_structured,
        was_unquoted: classified.was_unquoted,
    }
}

/// Like [`build_event`], with host and process identity filled in from
/// `process`.
pub fn build_event_with_process<L, T>(
    level: &L,
    message: &str,
    fields: &Fields,
    time: T,
    source: Option<&str>,
    process: &ProcessInfo,
) -> Event
where
    L: SourceLevel + ?Sized,
    T: Into<DateTime<FixedOffset>>,
{
    let mut event = build_event(level, message, fields, time, source);
    process.fill(&mut event.info);
    event
}

/// Split fields into plain data and extracted errors.
pub fn partition_fields(fields: &Fields) -> (EventData, Vec<EventError>) {
    let mut data = EventData::new();
    let mut errors = Vec::new();

    for (key, value) in fields {
        match value {
            FieldValue::Error(err) => errors.push(make_event_error(err)),
            FieldValue::Value(v) => {
                data.0.insert(key.clone(), v.clone());
            }
        }
    }

    (data, errors)
}

pub fn make_event_error(err: &ErrorValue) -> EventError {
    EventError {
        type_name: err.type_name().to_string(),
        error: err.message().to_string(),
        errno: err.errno().filter(|code| *code != 0),
        original: err.original().cloned(),
    }
}
