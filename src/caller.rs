//! Caller resolution for the `info.source` field.
//!
//! A `tracing` callsite's [`Metadata`] plays the part of a program counter:
//! it identifies where a log call (or an enclosing span) was written. The
//! "stack" is the event callsite followed by the spans it is nested in,
//! innermost first.

use std::fmt;
use tracing::Metadata;

/// A resolved frame.
pub type Frame = &'static Metadata<'static>;

/// Resolves a frame into a [`FuncInfo`]. Returning `None` leaves the source
/// empty.
pub type FuncInfoFn = fn(Frame) -> Option<FuncInfo>;

/// Human-readable location of a log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncInfo {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl fmt::Display for FuncInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.function, self.line)
    }
}

/// Pick the frame that made the log call.
///
/// Skips the first `depth` frames, then looks at no more than `max_depth`
/// frames and returns the first whose module path (or target, when the module
/// path is unknown) is not one of `skip_prefixes` or nested below one.
pub fn guess_caller<I, S>(frames: I, depth: usize, max_depth: usize, skip_prefixes: &[S]) -> Option<Frame>
where
    I: IntoIterator<Item = Frame>,
    S: AsRef<str>,
{
    frames
        .into_iter()
        .skip(depth)
        .take(max_depth)
        .find(|frame| {
            let module = frame.module_path().unwrap_or_else(|| frame.target());
            !skip_prefixes.iter().any(|p| is_within(module, p.as_ref()))
        })
}

/// `tracing` matches `tracing::span` but not `tracing_ecs_logs`.
fn is_within(module: &str, prefix: &str) -> bool {
    module
        .strip_prefix(prefix)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
}

/// Describe a frame. Fails when the callsite did not record its file.
///
/// For spans the function is `module::span_name`, matching what
/// `#[instrument]` produces; for events it is the module path.
pub fn func_info(frame: Frame) -> Option<FuncInfo> {
    let file = frame.file()?;
    let module = frame.module_path().unwrap_or_else(|| frame.target());
    let function = if frame.is_span() {
        format!("{}::{}", module, frame.name())
    } else {
        module.to_string()
    };

    Some(FuncInfo {
        file: file.to_string(),
        function,
        line: frame.line().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::callsite::{Callsite, Identifier};
    use tracing::field::FieldSet;
    use tracing::metadata::Kind;
    use tracing::{subscriber::Interest, Level};

    struct TestCallsite;

    impl Callsite for TestCallsite {
        fn set_interest(&self, _: Interest) {}

        fn metadata(&self) -> &Metadata<'_> {
            unreachable!()
        }
    }

    static CALLSITE: TestCallsite = TestCallsite;

    macro_rules! frame {
        ($name:ident, $module:expr, $file:expr, $line:expr, $kind:expr) => {
            static $name: Metadata<'static> = Metadata::new(
                "frame",
                $module,
                Level::INFO,
                $file,
                $line,
                Some($module),
                FieldSet::new(&[], Identifier(&CALLSITE)),
                $kind,
            );
        };
    }

    frame!(LIB, "ecs_logs::layer", Some("src/layer.rs"), Some(10), Kind::EVENT);
    frame!(APP, "my_app::handler", Some("src/handler.rs"), Some(42), Kind::EVENT);
    frame!(SPAN, "my_app::server", Some("src/server.rs"), Some(7), Kind::SPAN);
    frame!(NOFILE, "my_app::gen", None, None, Kind::EVENT);

    #[test]
    fn skips_library_frames() {
        let frames = [&LIB, &APP];
        let picked = guess_caller(frames, 0, 10, &["ecs_logs", "tracing"]).unwrap();
        assert_eq!(picked.module_path(), Some("my_app::handler"));
    }

    #[test]
    fn depth_and_max_depth_bound_the_search() {
        let frames = [&APP, &LIB, &SPAN];
        let picked = guess_caller(frames, 1, 10, &["ecs_logs"]).unwrap();
        assert_eq!(picked.module_path(), Some("my_app::server"));

        assert!(guess_caller(frames, 1, 1, &["ecs_logs"]).is_none());
        assert!(guess_caller(frames, 3, 10, &[] as &[&str]).is_none());
    }

    #[test]
    fn prefixes_match_whole_path_segments() {
        assert!(is_within("tracing", "tracing"));
        assert!(is_within("tracing::span", "tracing"));
        assert!(!is_within("tracing_ecs_logs::layer", "tracing"));
        assert!(!is_within("my_app", "my_app::handler"));
    }

    #[test]
    fn describes_events_and_spans() {
        let info = func_info(&APP).unwrap();
        assert_eq!(info.to_string(), "src/handler.rs:my_app::handler:42");

        let info = func_info(&SPAN).unwrap();
        assert_eq!(info.function, "my_app::server::frame");
    }

    #[test]
    fn missing_file_is_unresolved() {
        assert!(func_info(&NOFILE).is_none());
    }
}
