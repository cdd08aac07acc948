//! Runtime for the command source: OS process adapters, preview detection
//! and the per-source lifecycle state machine.
//!
//! The host drives everything from its own threads. Visibility and
//! activation callbacks land on [`CommandSource`], frontend notifications
//! are forwarded through [`CommandSource::handle_frontend_event`] and the
//! periodic tick calls [`CommandSource::tick`] to collect exited children.

#![deny(unsafe_code)]

pub mod preview;
pub mod process;
mod source;

// Re-export the lifecycle controller
pub use source::{CommandSource, Teardown};

// Re-export process adapters
pub use process::{ProcessRegistry, ProcessSlot, ShellLauncher, ShellProcess};

// Re-export preview detection
pub use preview::{PreviewDetector, PreviewTransition, is_source_in_preview};
