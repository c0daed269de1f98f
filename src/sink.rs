use crate::error::LogError;
use crate::event::Event;
use std::io::Write;
use std::sync::Mutex;

/// Destination for [`Event`]s produced by the builder or the layer.
///
/// Implementations must write each event completely or not at all, and must
/// not interleave concurrent writes.
pub trait EventSink: Send + Sync {
    /// Write a single event.
    ///
    /// **Returns**
    /// - `Ok(())` once the whole event has been handed to the destination.
    /// - `Err(LogError::Serialize)` if the event could not be encoded;
    ///   nothing was written.
    /// - `Err(LogError::Write)` if the destination failed. There is no
    ///   retry.
    fn log(&self, event: &Event) -> Result<(), LogError>;
}

/// Writes events as newline-delimited JSON to any [`Write`] destination.
///
/// The event is encoded before the lock is taken, so one call produces
/// exactly one `write_all` of one complete line.
pub struct Logger<W> {
    out: Mutex<W>,
}

impl<W: Write> Logger<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Return the destination, e.g. to inspect a buffer in tests.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Logger<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl Logger<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

/// Encode an event as one line, trailing newline included.
pub fn encode_line(event: &Event) -> Result<Vec<u8>, LogError> {
    let mut line = event.to_bytes()?;
    line.push(b'\n');
    Ok(line)
}

impl<W: Write + Send> EventSink for Logger<W> {
    fn log(&self, event: &Event) -> Result<(), LogError> {
        let line = encode_line(event)?;

        // Poisoned only if another writer panicked; lines are still whole.
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}
