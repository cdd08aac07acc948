//! Host frontend port.
//!
//! This is the callback surface the host application exposes to a command
//! source: scene queries, the active-children enumeration used for preview
//! detection, and notification subscription.

use crate::domain::SourceId;

/// Synchronous view of the host frontend.
///
/// All methods are called on the host's callback thread and must return
/// promptly; implementations are expected to answer from in-memory state.
pub trait FrontendPort {
    /// Display name of a source or scene, if it still exists.
    fn source_name(&self, source: SourceId) -> Option<String>;

    /// Scene currently on program output.
    fn current_scene(&self) -> Option<SourceId>;

    /// Scene currently in preview.
    ///
    /// Returns `None` when studio mode is off or no preview is selected.
    fn current_preview_scene(&self) -> Option<SourceId>;

    /// Whether studio (preview/program) mode is enabled.
    fn preview_program_mode_active(&self) -> bool;

    /// Current transition duration in milliseconds.
    fn transition_duration_ms(&self) -> i32;

    /// Visit every active element below `scene`, nested scenes included.
    fn enum_active_children(&self, scene: SourceId, visitor: &mut dyn FnMut(SourceId));

    /// Start delivering frontend notifications to `source`.
    ///
    /// Must be idempotent: subscribing twice is the same as once.
    fn subscribe(&mut self, source: SourceId);

    /// Stop delivering frontend notifications to `source`.
    ///
    /// Must be idempotent: unsubscribing an absent source is a no-op.
    fn unsubscribe(&mut self, source: SourceId);
}
