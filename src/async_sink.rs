use crate::error::LogError;
use crate::event::Event;
use crate::sink::encode_line;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Asynchronous counterpart of [`EventSink`](crate::sink::EventSink) for
/// callers that build events themselves inside a Tokio runtime.
#[async_trait]
pub trait AsyncEventSink: Send + Sync {
    /// Write a single event. Same contract as the synchronous sink: the
    /// event is written whole or not at all, and failures are returned.
    async fn log(&self, event: &Event) -> Result<(), LogError>;

    /// Flush the destination.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), LogError> {
        Ok(())
    }
}

/// Writes newline-delimited JSON events to a Tokio [`AsyncWrite`].
pub struct AsyncLogger<W> {
    out: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> AsyncLogger<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> AsyncEventSink for AsyncLogger<W> {
    async fn log(&self, event: &Event) -> Result<(), LogError> {
        let line = encode_line(event)?;
        let mut out = self.out.lock().await;
        out.write_all(&line).await?;
        out.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), LogError> {
        self.out.lock().await.flush().await?;
        Ok(())
    }
}
