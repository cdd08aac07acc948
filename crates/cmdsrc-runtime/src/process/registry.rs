//! Untracked child processes awaiting reaping.

use std::fmt;

use cmdsrc_core::ProcessHandle;
use tracing::debug;

/// Unordered collection of fire-and-forget children.
///
/// Entries are never signalled; they are only polled until they exit so the
/// OS can release them.
#[derive(Default)]
pub struct ProcessRegistry {
    handles: Vec<Box<dyn ProcessHandle>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a child until it exits.
    pub fn push(&mut self, handle: Box<dyn ProcessHandle>) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Pids of all tracked children.
    pub fn pids(&self) -> Vec<u32> {
        self.handles.iter().map(|h| h.pid()).collect()
    }

    /// Drop every child that has exited; returns how many were removed.
    ///
    /// Each entry is queried exactly once per call.
    pub fn reap_all(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }

        let before = self.handles.len();
        self.handles.retain_mut(|handle| {
            let alive = handle.is_alive();
            if !alive {
                debug!(pid = handle.pid(), "Reaped untracked process");
            }
            alive
        });
        before - self.handles.len()
    }

    /// Release every remaining handle without waiting for it.
    ///
    /// The children keep running; only our bookkeeping goes away.
    pub fn abandon(&mut self) -> usize {
        let count = self.handles.len();
        self.handles.clear();
        count
    }
}

impl fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("pids", &self.pids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdsrc_core::MockProcessHandle;

    fn handle(pid: u32, alive: bool) -> Box<dyn ProcessHandle> {
        let mut mock = MockProcessHandle::new();
        mock.expect_pid().return_const(pid);
        mock.expect_is_alive().return_const(alive);
        mock.expect_signal().never();
        Box::new(mock)
    }

    #[test]
    fn test_empty_registry_is_noop() {
        let mut registry = ProcessRegistry::new();
        assert_eq!(registry.reap_all(), 0);
    }

    #[test]
    fn test_adjacent_exits_are_not_skipped() {
        let mut registry = ProcessRegistry::new();
        registry.push(handle(1, false));
        registry.push(handle(2, false));
        registry.push(handle(3, true));
        registry.push(handle(4, false));

        assert_eq!(registry.reap_all(), 3);
        assert_eq!(registry.pids(), vec![3]);
    }

    #[test]
    fn test_reap_all_is_idempotent() {
        let mut registry = ProcessRegistry::new();
        registry.push(handle(1, false));
        registry.push(handle(2, true));

        assert_eq!(registry.reap_all(), 1);
        assert_eq!(registry.reap_all(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_each_entry_polled_once_per_reap() {
        let mut mock = MockProcessHandle::new();
        mock.expect_pid().return_const(9u32);
        mock.expect_is_alive().times(2).return_const(true);

        let mut registry = ProcessRegistry::new();
        registry.push(Box::new(mock));
        registry.reap_all();
        registry.reap_all();
        assert_eq!(registry.abandon(), 1);
        assert!(registry.is_empty());
    }
}
