use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an [`Event`](crate::event::Event), ordered from least to most
/// severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    None,
    Debug,
    Info,
    Warn,
    Error,
    Crit,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::None,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Crit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "NONE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Crit => "CRIT",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses the serialized names (`NONE`, `DEBUG`, ..., `CRIT`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// A severity coming from a logging front-end.
///
/// Every implementation is a total function onto [`Level`]: values it does
/// not recognize map to [`Level::None`], and no two recognized values map to
/// the same level.
pub trait SourceLevel {
    fn to_level(&self) -> Level;
}

impl SourceLevel for Level {
    fn to_level(&self) -> Level {
        *self
    }
}

/// `tracing` stops at ERROR, so it never produces [`Level::Crit`]. TRACE sits
/// below everything the collector knows about.
impl SourceLevel for tracing::Level {
    fn to_level(&self) -> Level {
        match *self {
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
            _ => Level::None,
        }
    }
}

/// Level names as used by string-keyed front-ends: `debug`, `info`, `warn`,
/// `error` and `fatal`.
impl SourceLevel for str {
    fn to_level(&self) -> Level {
        match self.to_ascii_lowercase().as_str() {
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Crit,
            _ => Level::None,
        }
    }
}

impl<L: SourceLevel + ?Sized> SourceLevel for &L {
    fn to_level(&self) -> Level {
        (**self).to_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn levels_are_ordered_by_severity() {
        let mut sorted = Level::ALL;
        sorted.sort();
        assert_eq!(sorted, Level::ALL);
        assert!(Level::Crit > Level::Error);
        assert!(Level::None < Level::Debug);
    }

    #[test]
    fn default_is_none() {
        assert_eq!(Level::default(), Level::None);
    }

    #[test]
    fn serializes_as_uppercase_name() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), r#""WARN""#);
        assert_eq!(serde_json::to_string(&Level::Crit).unwrap(), r#""CRIT""#);
        assert_eq!(serde_json::to_string(&Level::None).unwrap(), r#""NONE""#);
    }

    #[test]
    fn parses_its_own_names() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        assert_eq!("warn".parse::<Level>(), Ok(Level::Warn));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn tracing_mapping_is_injective() {
        let levels = [
            tracing::Level::TRACE,
            tracing::Level::DEBUG,
            tracing::Level::INFO,
            tracing::Level::WARN,
            tracing::Level::ERROR,
        ];
        let mapped: HashSet<Level> = levels.iter().map(|l| l.to_level()).collect();
        assert_eq!(mapped.len(), levels.len());
        assert_eq!(tracing::Level::ERROR.to_level(), Level::Error);
        assert_eq!(tracing::Level::TRACE.to_level(), Level::None);
    }

    #[test]
    fn name_mapping_covers_fatal_and_unknown() {
        assert_eq!("fatal".to_level(), Level::Crit);
        assert_eq!("ERROR".to_level(), Level::Error);
        assert_eq!("debug".to_level(), Level::Debug);
        assert_eq!("notice".to_level(), Level::None);
        assert_eq!("".to_level(), Level::None);

        let names = ["debug", "info", "warn", "error", "fatal"];
        let mapped: HashSet<Level> = names.iter().map(|n| n.to_level()).collect();
        assert_eq!(mapped.len(), names.len());
        assert!(!mapped.contains(&Level::None));
    }
}
