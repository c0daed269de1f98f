use crate::caller::{func_info, FuncInfoFn};
use crate::env::{env_or, ECS_LOGS_LEVEL_ENV};
use crate::error::LogError;
use crate::layer::EcsLayer;
use crate::level::Level;
use crate::process::ProcessInfo;
use crate::sink::EventSink;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of [`EcsLayer`].
///
/// **Fields**
/// - `min_level`: events mapped below this level are not written.
/// - `func_info`: resolver for `info.source`; `None` leaves it empty.
/// - `depth`: frames to skip before looking for the caller.
/// - `max_depth`: maximum number of frames inspected.
/// - `skip_prefixes`: module prefixes of logging plumbing that never count
///   as the caller.
/// - `process`: host and process identity copied into every event.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   installed next to the `EcsLayer` and events are also printed to the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: Level,
    pub func_info: Option<FuncInfoFn>,
    pub depth: usize,
    pub max_depth: usize,
    pub skip_prefixes: Vec<String>,
    pub process: Option<ProcessInfo>,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::None,
            func_info: None,
            depth: 0,
            max_depth: 10,
            skip_prefixes: vec![
                "tracing".to_string(),
                "tracing_core".to_string(),
                "tracing_subscriber".to_string(),
                "tracing_log".to_string(),
            ],
            process: None,
            enable_stdout: false,
        }
    }
}

impl LayerConfig {
    /// Defaults, with `min_level` taken from `ECS_LOGS_LEVEL` when it holds a
    /// valid level name and process identity captured from the environment.
    pub fn from_env() -> Self {
        let min_level = env_or(ECS_LOGS_LEVEL_ENV, "NONE").parse().unwrap_or(Level::None);
        Self::default()
            .with_min_level(min_level)
            .with_process_info(ProcessInfo::current())
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Resolve `info.source` from callsite metadata.
    pub fn with_source(self) -> Self {
        self.with_func_info(func_info)
    }

    pub fn with_func_info(mut self, f: FuncInfoFn) -> Self {
        self.func_info = Some(f);
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_skip_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.skip_prefixes = prefixes;
        self
    }

    pub fn with_process_info(mut self, process: ProcessInfo) -> Self {
        self.process = Some(process);
        self
    }

    pub fn with_stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }
}

/// Initialize global `tracing` subscriber using the provided sink and
/// [`LayerConfig`].
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`EcsLayer`] as the
/// global default subscriber, so all `tracing` events in the process
/// are observed by the layer.
///
/// **Returns**
/// - `Err(LogError::Init)` if a global subscriber was already installed.
pub fn init_tracing_with_config(sink: Arc<dyn EventSink>, config: LayerConfig) -> Result<(), LogError> {
    let enable_stdout = config.enable_stdout;
    let layer = EcsLayer::new(sink, config);

    // The two subscriber stacks have different types, so each is installed
    // on its own branch.
    if enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Initialize tracing with sensible defaults.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing(sink: Arc<dyn EventSink>) -> Result<(), LogError> {
    init_tracing_with_config(sink, LayerConfig::default())
}
