//! Child process infrastructure for command sources.
//!
//! # Structure
//!
//! - `ShellLauncher` / `ShellProcess` - Spawn shell commands and query them without blocking
//! - `ProcessRegistry` - Fire-and-forget children waiting to be reaped
//! - `ProcessSlot` - One killable child per lifecycle pair (show/hide, ...)
//!
//! Nothing here ever waits on a child. Exited children are collected by
//! polling from the host's tick.

mod registry;
mod shell;
mod slot;

pub use registry::ProcessRegistry;
pub use shell::{ShellLauncher, ShellProcess};
pub use slot::ProcessSlot;
