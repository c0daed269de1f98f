use std::io;
use std::sync::Arc;

use tracing::{error, info};
use tracing_ecs_logs::{
    error::LogError,
    event::Event,
    init::{init_tracing_with_config, LayerConfig},
    sink::{EventSink, Logger},
};

/// Example of plugging in a custom destination by implementing the
/// `EventSink` trait directly. Events carrying errors go to stderr, the rest
/// to stdout; a real one might write to a socket or a file.
struct SplitSink {
    out: Logger<io::Stdout>,
    err: Logger<io::Stderr>,
}

impl EventSink for SplitSink {
    fn log(&self, event: &Event) -> Result<(), LogError> {
        if event.info.errors.is_empty() {
            self.out.log(event)
        } else {
            self.err.log(event)
        }
    }
}

fn main() -> Result<(), LogError> {
    let sink: Arc<dyn EventSink> = Arc::new(SplitSink {
        out: Logger::stdout(),
        err: Logger::stderr(),
    });

    init_tracing_with_config(sink, LayerConfig::from_env().with_source())?;

    info!("custom sink example started");
    info!(r#"{{"request":"GET /","status":200}}"#);

    let err = io::Error::from_raw_os_error(111);
    error!(
        cause = &err as &(dyn std::error::Error + 'static),
        db = "orders",
        "connection refused"
    );
    Ok(())
}
