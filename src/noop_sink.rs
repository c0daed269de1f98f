use crate::error::LogError;
use crate::event::Event;
use crate::sink::EventSink;

/// A sink that simply drops all events.
///
/// Useful for measuring the overhead of the layer itself without any
/// I/O, and for unit tests that don't care about output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log(&self, _event: &Event) -> Result<(), LogError> {
        Ok(())
    }
}
