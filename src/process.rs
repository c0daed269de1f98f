use crate::env::{env_or, ECS_LOGS_HOST_ENV, ECS_LOGS_ID_ENV};
use crate::event::EventInfo;

/// Host and process identity copied into every event's `info` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessInfo {
    pub host: String,
    /// Deployment-specific identifier, e.g. a container or task id.
    pub id: String,
    pub pid: u32,
    pub uid: u32,
    pub gid: u32,
}

impl ProcessInfo {
    /// Capture the identity of the running process.
    ///
    /// `host` and `id` can be overridden through `ECS_LOGS_HOST` and
    /// `ECS_LOGS_ID`; the host defaults to the machine's host name and the id
    /// to empty.
    pub fn current() -> Self {
        let host = std::env::var(ECS_LOGS_HOST_ENV).unwrap_or_else(|_| {
            hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let (uid, gid) = user_ids();

        Self {
            host,
            id: env_or(ECS_LOGS_ID_ENV, ""),
            pid: std::process::id(),
            uid,
            gid,
        }
    }

    /// Copy the identity into `info`, leaving source and errors alone.
    pub fn fill(&self, info: &mut EventInfo) {
        info.host.clone_from(&self.host);
        info.id.clone_from(&self.id);
        info.pid = self.pid;
        info.uid = self.uid;
        info.gid = self.gid;
    }
}

#[cfg(unix)]
fn user_ids() -> (u32, u32) {
    (
        nix::unistd::getuid().as_raw(),
        nix::unistd::getgid().as_raw(),
    )
}

#[cfg(not(unix))]
fn user_ids() -> (u32, u32) {
    (0, 0)
}
