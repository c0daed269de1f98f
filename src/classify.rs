//! Decides how a free-text log message is represented in the event payload.
//!
//! Collectors expect `message` to be a JSON value. Messages that already are
//! JSON are passed through; messages that are a JSON string literal whose
//! content is itself JSON (double-encoded) are unwrapped once; everything else
//! is wrapped as `{"string": <message>}`.

use serde::Serialize;
use serde_json::value::RawValue;

/// Result of [`classify`].
#[derive(Debug, Clone)]
pub struct Classified {
    /// JSON payload stored as the event's `message`.
    pub payload: Box<RawValue>,
    /// `true` when the message was valid JSON, `false` when it was wrapped.
    pub is_structured: bool,
    /// `true` when the payload came from unquoting a JSON string literal.
    pub was_unquoted: bool,
}

/// `{"string": ...}` wrapper for messages that are not JSON.
#[derive(Serialize)]
struct Wrapped<'a> {
    string: &'a str,
}

/// Classify a raw message. Never fails: anything that is not JSON becomes an
/// opaque string.
pub fn classify(message: &str) -> Classified {
    let Some(parsed) = parse_json(message) else {
        return Classified {
            payload: wrap_string(message),
            is_structured: false,
            was_unquoted: false,
        };
    };

    let inner = unquote(message).and_then(|unquoted| parse_json(&unquoted));

    match inner {
        Some(payload) => Classified {
            payload,
            is_structured: true,
            was_unquoted: true,
        },
        None => Classified {
            payload: parsed,
            is_structured: true,
            was_unquoted: false,
        },
    }
}

/// Parses any JSON token. Surrounding whitespace is accepted and dropped.
fn parse_json(text: &str) -> Option<Box<RawValue>> {
    serde_json::from_str::<Box<RawValue>>(text).ok()
}

/// Unescapes a message that is exactly one JSON string literal. Surrounding
/// whitespace makes it fail, as does any other JSON value.
fn unquote(raw: &str) -> Option<String> {
    if !raw.ends_with('"') {
        return None;
    }
    if !raw.starts_with('"') {
        return None;
    }
    serde_json::from_str::<String>(raw).ok()
}

fn wrap_string(message: &str) -> Box<RawValue> {
    // A struct holding a single &str always serializes.
    serde_json::value::to_raw_value(&Wrapped { string: message })
        .expect("string wrapper is serializable")
}
