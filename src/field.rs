use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Fields attached to a log call, keyed by name. Iteration order is key order,
/// which fixes the order in which errors are extracted.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value: either an opaque JSON value or an error.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Value(serde_json::Value),
    Error(ErrorValue),
}

impl FieldValue {
    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Wrap a concrete error. See [`ErrorValue::new`].
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        FieldValue::Error(ErrorValue::new(err))
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<ErrorValue> for FieldValue {
    fn from(value: ErrorValue) -> Self {
        FieldValue::Error(value)
    }
}

macro_rules! value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    FieldValue::Value(serde_json::Value::from(value))
                }
            }
        )*
    };
}

value_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// An error captured from a log call.
///
/// The type name is supplied explicitly or taken from the static type at
/// construction; it is never recovered by runtime inspection of an opaque
/// value.
#[derive(Clone)]
pub struct ErrorValue {
    type_name: Cow<'static, str>,
    message: String,
    errno: Option<i32>,
    original: Option<Arc<dyn Error + Send + Sync>>,
}

impl ErrorValue {
    /// Capture `err`, naming it after its Rust type.
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::with_type(std::any::type_name::<E>(), err)
    }

    /// Capture `err` under an explicit display name.
    pub fn with_type<E>(type_name: impl Into<Cow<'static, str>>, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            message: err.to_string(),
            errno: find_errno(&err),
            original: Some(Arc::new(err)),
        }
    }

    /// Capture a borrowed error as handed over by `tracing`. The original
    /// cannot be retained; the type name comes from [`known_type_name`].
    pub fn from_dyn(err: &(dyn Error + 'static)) -> Self {
        Self {
            type_name: Cow::Borrowed(known_type_name(err)),
            message: err.to_string(),
            errno: find_errno(err),
            original: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// OS error code, when the error is or wraps one.
    pub fn errno(&self) -> Option<i32> {
        self.errno
    }

    pub fn original(&self) -> Option<&Arc<dyn Error + Send + Sync>> {
        self.original.as_ref()
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorValue")
            .field("type_name", &self.type_name)
            .field("message", &self.message)
            .field("errno", &self.errno)
            .finish()
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Name used for borrowed errors whose type is not in the known table.
pub const DYN_ERROR_TYPE: &str = "dyn std::error::Error";

/// Display name for a borrowed error, resolved by downcasting against a fixed
/// table of common error types.
pub fn known_type_name(err: &(dyn Error + 'static)) -> &'static str {
    macro_rules! table {
        ($($t:ty),* $(,)?) => {
            $(
                if err.is::<$t>() {
                    return std::any::type_name::<$t>();
                }
            )*
        };
    }

    table!(
        io::Error,
        fmt::Error,
        std::num::ParseIntError,
        std::num::ParseFloatError,
        std::num::TryFromIntError,
        std::str::Utf8Error,
        std::string::FromUtf8Error,
        std::str::ParseBoolError,
        serde_json::Error,
        chrono::ParseError,
    );

    DYN_ERROR_TYPE
}

/// First OS error code found in `err` or its `source()` chain.
fn find_errno(err: &(dyn Error + 'static)) -> Option<i32> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(code) = e.downcast_ref::<io::Error>().and_then(io::Error::raw_os_error) {
            return Some(code);
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Eof;

    impl fmt::Display for Eof {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("EOF")
        }
    }

    impl Error for Eof {}

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "open failed: {}", self.0)
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn concrete_errors_are_named_after_their_type() {
        let e = ErrorValue::new(Eof);
        assert!(e.type_name().ends_with("Eof"), "{}", e.type_name());
        assert_eq!(e.message(), "EOF");
        assert_eq!(e.errno(), None);
        assert!(e.original().is_some());
    }

    #[test]
    fn explicit_type_name_wins() {
        let e = ErrorValue::with_type("*errors.errorString", Eof);
        assert_eq!(e.type_name(), "*errors.errorString");
        assert_eq!(e.to_string(), "EOF");
    }

    #[test]
    fn os_errors_carry_errno() {
        let e = ErrorValue::new(io::Error::from_raw_os_error(2));
        assert_eq!(e.errno(), Some(2));

        let e = ErrorValue::new(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF"));
        assert_eq!(e.errno(), None);
        assert_eq!(e.message(), "EOF");
    }

    #[test]
    fn errno_is_found_through_source_chain() {
        let e = ErrorValue::new(Wrapper(io::Error::from_raw_os_error(13)));
        assert_eq!(e.errno(), Some(13));
        assert!(e.type_name().ends_with("Wrapper"));
    }

    #[test]
    fn borrowed_errors_use_known_table() {
        let io_err = io::Error::new(io::ErrorKind::Other, "boom");
        let e = ErrorValue::from_dyn(&io_err);
        assert_eq!(e.type_name(), std::any::type_name::<io::Error>());
        assert_eq!(e.message(), "boom");
        assert!(e.original().is_none());

        let parse_err = "x".parse::<i32>().unwrap_err();
        let e = ErrorValue::from_dyn(&parse_err);
        assert_eq!(e.type_name(), std::any::type_name::<std::num::ParseIntError>());

        let e = ErrorValue::from_dyn(&Eof);
        assert_eq!(e.type_name(), DYN_ERROR_TYPE);
        assert_eq!(e.message(), "EOF");
    }

    #[test]
    fn field_values_from_primitives() {
        assert!(matches!(FieldValue::from("alice"), FieldValue::Value(serde_json::Value::String(_))));
        assert!(!FieldValue::from(42i64).is_error());
        assert!(FieldValue::error(Eof).is_error());
    }
}
