pub mod level;
pub mod classify;
pub mod field;
pub mod event;
pub mod builder;
pub mod caller;
pub mod process;
pub mod error;
pub mod sink;
pub mod noop_sink;
pub mod layer;
pub mod init;
pub mod env;

#[cfg(feature = "tokio")]
pub mod async_sink;
