//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from the host
//! application and from the operating system. They contain no implementation
//! details and use only domain types.
//!
//! # Design Rules
//!
//! - No `nix`/`std::process` types in any signature
//! - Host queries are synchronous and must not block
//! - Process handles express capability (liveness, signalling), not pid plumbing

pub mod frontend;
pub mod process;

use thiserror::Error;

pub use frontend::FrontendPort;
pub use process::{CommandLauncher, ProcessHandle};

#[cfg(any(test, feature = "test-utils"))]
pub use process::{MockCommandLauncher, MockProcessHandle};

/// Errors from starting a child process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The command string was empty after trimming.
    #[error("Refusing to launch an empty command")]
    EmptyCommand,

    /// The process creation call itself failed.
    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        /// The command line that could not be started.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors from delivering a signal to a child process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// The target has already exited; delivery is skipped.
    #[error("Process has already exited")]
    AlreadyExited,

    /// The number does not name a signal on this platform.
    #[error("Invalid signal number: {0}")]
    InvalidSignal(i32),

    /// Delivery failed for another OS reason.
    #[error("Signal delivery failed: {0}")]
    Os(String),
}
