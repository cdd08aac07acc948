//! Process launcher and handle ports.
//!
//! The runtime provides one launcher per platform family; tests substitute
//! mocks (enable the `test-utils` feature to get them outside this crate).

use crate::domain::LaunchContext;

use super::{LaunchError, SignalError};

/// Capability over one launched child process.
///
/// Handles never block: liveness is a non-blocking status query and
/// signalling is fire-and-forget.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait ProcessHandle: Send {
    /// OS process id, used for diagnostics.
    fn pid(&self) -> u32;

    /// Non-blocking liveness check.
    ///
    /// Reaps the child when it has exited. A failed status query reports
    /// the process as still alive so the next poll retries it.
    fn is_alive(&mut self) -> bool;

    /// Deliver `signal` to the process.
    ///
    /// Returns `Err(SignalError::AlreadyExited)` when the process is known
    /// to be gone; callers treat that as a silent no-op.
    fn signal(&mut self, signal: i32) -> Result<(), SignalError>;
}

/// Starts shell commands as detached child processes.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait CommandLauncher {
    /// Launch `command` through the platform shell.
    ///
    /// Returns as soon as the child exists; never waits for it.
    fn launch(
        &self,
        command: &str,
        context: &LaunchContext,
    ) -> Result<Box<dyn ProcessHandle>, LaunchError>;
}
