//! Shell command launching for Unix and Windows.

use std::io;
use std::path::PathBuf;
use std::process::{Child, Command};

use cmdsrc_core::{CommandLauncher, LaunchContext, LaunchError, ProcessHandle, SignalError};
use tracing::debug;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(unix)]
const DEFAULT_SHELL: &str = "/bin/sh";

#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd.exe";

/// Launches commands through the platform shell.
///
/// On Unix the command runs as `/bin/sh -c <command>` with the launch
/// context exported as `OBS_*` environment variables. On Windows the command
/// line is handed to `cmd /C` verbatim, at below-normal priority and without
/// a console window.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    shell: PathBuf,
}

impl ShellLauncher {
    /// Create a launcher using the platform default shell.
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }

    /// Use a different shell binary.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    #[cfg(unix)]
    fn build_command(&self, command: &str, context: &LaunchContext) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        cmd.envs(context.env_vars());
        cmd
    }

    #[cfg(windows)]
    fn build_command(&self, command: &str, _context: &LaunchContext) -> Command {
        const BELOW_NORMAL_PRIORITY_CLASS: u32 = 0x0000_4000;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;

        let mut cmd = Command::new(&self.shell);
        cmd.arg("/C").raw_arg(command);
        cmd.creation_flags(BELOW_NORMAL_PRIORITY_CLASS | CREATE_NO_WINDOW);
        cmd
    }
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLauncher for ShellLauncher {
    fn launch(
        &self,
        command: &str,
        context: &LaunchContext,
    ) -> Result<Box<dyn ProcessHandle>, LaunchError> {
        if command.trim().is_empty() {
            return Err(LaunchError::EmptyCommand);
        }

        let child = self
            .build_command(command, context)
            .spawn()
            .map_err(|source| LaunchError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;

        debug!(pid = child.id(), shell = %self.shell.display(), "Spawned shell");
        Ok(Box::new(ShellProcess::new(child)))
    }
}

/// A launched child, queried and signalled without ever blocking.
#[derive(Debug)]
pub struct ShellProcess {
    child: Child,
    /// Set once the exit status has been collected; the pid may be reused after that.
    exited: bool,
}

impl ShellProcess {
    pub const fn new(child: Child) -> Self {
        Self {
            child,
            exited: false,
        }
    }
}

impl ProcessHandle for ShellProcess {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        if self.exited {
            return false;
        }

        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = self.child.id(), ?status, "Process exited");
                self.exited = true;
                false
            }
            Ok(None) => true,
            Err(e) if already_collected(&e) => {
                debug!(pid = self.child.id(), "Exit status already collected elsewhere");
                self.exited = true;
                false
            }
            Err(e) => {
                debug!(pid = self.child.id(), error = %e, "Status query failed, retrying next poll");
                true
            }
        }
    }

    fn signal(&mut self, signal: i32) -> Result<(), SignalError> {
        if !self.is_alive() {
            return Err(SignalError::AlreadyExited);
        }
        deliver_signal(&mut self.child, signal)
    }
}

/// The OS no longer knows the child, e.g. because SIGCHLD is ignored.
#[cfg(unix)]
fn already_collected(error: &io::Error) -> bool {
    error.raw_os_error() == Some(nix::errno::Errno::ECHILD as i32)
}

#[cfg(not(unix))]
const fn already_collected(_error: &io::Error) -> bool {
    false
}

#[cfg(unix)]
fn deliver_signal(child: &mut Child, signal: i32) -> Result<(), SignalError> {
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let sig = Signal::try_from(signal).map_err(|_| SignalError::InvalidSignal(signal))?;
    let raw_pid = i32::try_from(child.id())
        .map_err(|_| SignalError::Os(format!("pid {} out of range", child.id())))?;

    match signal::kill(Pid::from_raw(raw_pid), sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => Err(SignalError::AlreadyExited),
        Err(e) => Err(SignalError::Os(e.to_string())),
    }
}

// No signals outside Unix: any termination request ends the process.
#[cfg(not(unix))]
fn deliver_signal(child: &mut Child, _signal: i32) -> Result<(), SignalError> {
    child.kill().map_err(|e| SignalError::Os(e.to_string()))
}
