use std::io;

/// Error type returned by sinks and by subscriber installation.
///
/// Nothing in this crate reports these through a secondary channel: every
/// failure goes back to the immediate caller of the operation.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    /// The event could not be represented as JSON. Nothing was written.
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The destination rejected the write.
    #[error("failed to write event: {0}")]
    Write(#[from] io::Error),

    #[error("failed to install global subscriber: {0}")]
    Init(#[from] tracing::subscriber::SetGlobalDefaultError),
}
