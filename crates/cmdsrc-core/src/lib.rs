//! Core domain types and port definitions for the command source.
//!
//! A command source is a visual element whose visibility, activation and
//! preview membership drive external shell commands. This crate holds the
//! pieces that carry no OS behaviour: identities, the launch context handed
//! to child processes, settings, host notifications and the port traits the
//! runtime is written against.

pub mod domain;
pub mod events;
pub mod ports;
pub mod settings;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::{LaunchContext, SourceId};
pub use events::{FrontendEvent, FrontendEventRegistry};
pub use ports::{CommandLauncher, FrontendPort, LaunchError, ProcessHandle, SignalError};
pub use settings::{
    CommandSettings, SettingsError, SlotKind, SlotPolicy, TerminationSignal, Trigger,
};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::{MockCommandLauncher, MockProcessHandle};
