//! Named process slots.
//!
//! A slot holds the one child started by the opening event of a lifecycle
//! pair (show, activate, preview-enter) so the closing event can signal it.

use std::fmt;

use cmdsrc_core::{
    CommandLauncher, LaunchContext, LaunchError, ProcessHandle, SignalError, SlotKind,
};
use tracing::{debug, warn};

use super::registry::ProcessRegistry;

/// At most one live child plus the signal that terminates it.
pub struct ProcessSlot {
    kind: SlotKind,
    occupant: Option<Box<dyn ProcessHandle>>,
    signal: Option<i32>,
}

impl ProcessSlot {
    pub const fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            occupant: None,
            signal: None,
        }
    }

    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Pid of the current occupant.
    pub fn pid(&self) -> Option<u32> {
        self.occupant.as_ref().map(|h| h.pid())
    }

    /// Signal that [`terminate_if_armed`](Self::terminate_if_armed) would send.
    pub const fn armed_signal(&self) -> Option<i32> {
        self.signal
    }

    /// Launch `command` and install the child in this slot.
    ///
    /// On failure the slot is left untouched.
    pub fn launch(
        &mut self,
        launcher: &dyn CommandLauncher,
        command: &str,
        context: &LaunchContext,
        signal: Option<i32>,
        registry: &mut ProcessRegistry,
    ) -> Result<u32, LaunchError> {
        let handle = launcher.launch(command, context)?;
        let pid = handle.pid();
        self.install(handle, signal, registry);
        Ok(pid)
    }

    /// Install `handle`, demoting any previous occupant into `registry`.
    pub fn install(
        &mut self,
        handle: Box<dyn ProcessHandle>,
        signal: Option<i32>,
        registry: &mut ProcessRegistry,
    ) {
        if let Some(previous) = self.occupant.take() {
            debug!(slot = ?self.kind, pid = previous.pid(), "Demoting previous slot occupant");
            registry.push(previous);
        }
        self.occupant = Some(handle);
        self.signal = signal;
    }

    /// Replace the termination signal of the current occupant.
    pub fn rearm(&mut self, signal: Option<i32>) {
        if self.occupant.is_some() {
            self.signal = signal;
        }
    }

    /// Send the armed signal to the occupant, if both exist.
    ///
    /// The occupant stays in the slot until [`poll`](Self::poll) sees it
    /// exit. Returns whether a signal was delivered.
    pub fn terminate_if_armed(&mut self) -> bool {
        let (Some(handle), Some(signal)) = (self.occupant.as_mut(), self.signal) else {
            return false;
        };

        match handle.signal(signal) {
            Ok(()) => {
                debug!(slot = ?self.kind, pid = handle.pid(), signal, "Sent termination signal");
                true
            }
            Err(SignalError::AlreadyExited) => {
                debug!(slot = ?self.kind, pid = handle.pid(), "Occupant already exited, signal skipped");
                false
            }
            Err(e) => {
                warn!(slot = ?self.kind, pid = handle.pid(), signal, error = %e, "Failed to signal slot process");
                false
            }
        }
    }

    /// Clear the slot if its occupant has exited. Returns whether it was cleared.
    pub fn poll(&mut self) -> bool {
        let exited = self.occupant.as_mut().is_some_and(|handle| !handle.is_alive());
        if exited {
            if let Some(handle) = self.occupant.take() {
                debug!(slot = ?self.kind, pid = handle.pid(), "Slot process exited");
            }
            self.signal = None;
        }
        exited
    }

    /// Remove the occupant without signalling it.
    pub fn take(&mut self) -> Option<Box<dyn ProcessHandle>> {
        self.signal = None;
        self.occupant.take()
    }
}

impl fmt::Debug for ProcessSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSlot")
            .field("kind", &self.kind)
            .field("pid", &self.pid())
            .field("signal", &self.signal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdsrc_core::{MockCommandLauncher, MockProcessHandle};
    use mockall::predicate::eq;

    fn quiet_handle(pid: u32) -> MockProcessHandle {
        let mut mock = MockProcessHandle::new();
        mock.expect_pid().return_const(pid);
        mock
    }

    #[test]
    fn test_install_demotes_previous_exactly_once() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Show);

        slot.install(Box::new(quiet_handle(100)), Some(15), &mut registry);
        assert!(registry.is_empty());

        slot.install(Box::new(quiet_handle(101)), None, &mut registry);
        assert_eq!(registry.pids(), vec![100]);
        assert_eq!(slot.pid(), Some(101));
        assert_eq!(slot.armed_signal(), None);
    }

    #[test]
    fn test_terminate_without_signal_is_noop() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Activate);
        let mut mock = quiet_handle(7);
        mock.expect_signal().never();

        slot.install(Box::new(mock), None, &mut registry);
        assert!(!slot.terminate_if_armed());
        assert!(slot.is_occupied());
    }

    #[test]
    fn test_terminate_empty_slot_is_noop() {
        let mut slot = ProcessSlot::new(SlotKind::Preview);
        assert!(!slot.terminate_if_armed());
    }

    #[test]
    fn test_armed_slot_sends_one_signal() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Show);
        let mut mock = quiet_handle(8);
        mock.expect_signal().with(eq(15)).times(1).returning(|_| Ok(()));

        slot.install(Box::new(mock), Some(15), &mut registry);
        assert!(slot.terminate_if_armed());
        // Still occupied until the exit is observed.
        assert!(slot.is_occupied());
    }

    #[test]
    fn test_signal_to_exited_process_is_tolerated() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Show);
        let mut mock = quiet_handle(8);
        mock.expect_signal()
            .times(1)
            .returning(|_| Err(SignalError::AlreadyExited));

        slot.install(Box::new(mock), Some(2), &mut registry);
        assert!(!slot.terminate_if_armed());
    }

    #[test]
    fn test_poll_clears_exited_occupant() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Show);
        let mut mock = quiet_handle(8);
        let mut alive = vec![false, true];
        mock.expect_is_alive()
            .times(2)
            .returning(move || alive.pop().unwrap_or(false));

        slot.install(Box::new(mock), Some(15), &mut registry);
        assert!(!slot.poll());
        assert!(slot.poll());
        assert!(!slot.is_occupied());
        assert_eq!(slot.armed_signal(), None);
        assert!(!slot.poll());
    }

    #[test]
    fn test_rearm_only_applies_to_occupied_slot() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Preview);
        slot.rearm(Some(9));
        assert_eq!(slot.armed_signal(), None);

        slot.install(Box::new(quiet_handle(3)), None, &mut registry);
        slot.rearm(Some(9));
        assert_eq!(slot.armed_signal(), Some(9));
    }

    #[test]
    fn test_launch_failure_leaves_slot_untouched() {
        let mut registry = ProcessRegistry::new();
        let mut slot = ProcessSlot::new(SlotKind::Show);
        slot.install(Box::new(quiet_handle(1)), Some(15), &mut registry);

        let mut launcher = MockCommandLauncher::new();
        launcher.expect_launch().times(1).returning(|_, _| {
            Err(LaunchError::SpawnFailed {
                command: "x".to_string(),
                source: std::io::Error::other("fork failed"),
            })
        });

        let result = slot.launch(&launcher, "x", &LaunchContext::default(), None, &mut registry);
        assert!(result.is_err());
        assert_eq!(slot.pid(), Some(1));
        assert_eq!(slot.armed_signal(), Some(15));
        assert!(registry.is_empty());
    }
}
