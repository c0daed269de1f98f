//! Environment variable names used by this crate for configuring the layer
//! from services.
//!
//! These are purely helpers; the builder and sinks never read the
//! environment themselves.

/// Overrides the `info.host` reported by [`ProcessInfo::current`](crate::process::ProcessInfo::current).
pub const ECS_LOGS_HOST_ENV: &str = "ECS_LOGS_HOST";

/// Deployment identifier reported as `info.id`, e.g. an ECS task id.
pub const ECS_LOGS_ID_ENV: &str = "ECS_LOGS_ID";

/// Minimum level written by the layer (`DEBUG`, `INFO`, ...).
pub const ECS_LOGS_LEVEL_ENV: &str = "ECS_LOGS_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
