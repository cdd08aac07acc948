//! Frontend notifications and the host-held subscription registry.
//!
//! The host fires one broadcast per frontend event. Command sources that
//! are currently shown register themselves in a [`FrontendEventRegistry`];
//! the host walks the registry and hands each subscriber the event.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::SourceId;

/// Frontend notification kinds a command source can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontendEvent {
    /// The program scene changed.
    SceneChanged,
    /// The preview scene changed (studio mode).
    PreviewSceneChanged,
    /// Studio mode was switched on.
    StudioModeEnabled,
    /// Studio mode was switched off.
    StudioModeDisabled,
    /// The active transition changed.
    TransitionChanged,
    /// The transition duration changed.
    TransitionDurationChanged,
    /// The host is shutting down.
    Exit,
}

impl FrontendEvent {
    /// Whether this event can change which elements are in preview.
    pub const fn affects_preview(self) -> bool {
        matches!(
            self,
            Self::SceneChanged
                | Self::PreviewSceneChanged
                | Self::StudioModeEnabled
                | Self::StudioModeDisabled
        )
    }
}

/// Set of sources subscribed to frontend notifications.
///
/// Add and remove are idempotent set operations. Iteration order is by
/// source id so dispatch is deterministic.
#[derive(Debug, Clone, Default)]
pub struct FrontendEventRegistry {
    subscribers: BTreeSet<SourceId>,
}

impl FrontendEventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source`. Returns `true` if it was not registered before.
    pub fn add(&mut self, source: SourceId) -> bool {
        self.subscribers.insert(source)
    }

    /// Unregister `source`. Returns `true` if it was registered.
    pub fn remove(&mut self, source: SourceId) -> bool {
        self.subscribers.remove(&source)
    }

    /// Whether `source` is currently registered.
    pub fn contains(&self, source: SourceId) -> bool {
        self.subscribers.contains(&source)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no source is registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Snapshot of the subscribers to dispatch `event` to.
    ///
    /// Returns an empty list for events that cannot affect preview state,
    /// so the host can skip the dispatch loop entirely. The snapshot lets
    /// handlers unsubscribe while the host is still dispatching.
    pub fn recipients(&self, event: FrontendEvent) -> Vec<SourceId> {
        if event.affects_preview() {
            self.subscribers.iter().copied().collect()
        } else {
            Vec::new()
        }
    }
}
