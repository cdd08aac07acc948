//! In-memory frontend for tests.
//!
//! `ScriptedFrontend` answers every [`FrontendPort`] query from plain
//! fields that tests set up and mutate between lifecycle calls.

use std::collections::HashMap;

use crate::domain::SourceId;
use crate::events::FrontendEventRegistry;
use crate::ports::FrontendPort;

/// Frontend whose scene graph is a fixed map of scene to active children.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFrontend {
    pub names: HashMap<SourceId, String>,
    pub children: HashMap<SourceId, Vec<SourceId>>,
    pub program_scene: Option<SourceId>,
    pub preview_scene: Option<SourceId>,
    pub studio_mode: bool,
    pub transition_duration_ms: i32,
    pub registry: FrontendEventRegistry,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self {
            transition_duration_ms: 300,
            ..Self::default()
        }
    }

    /// Register a named element.
    #[must_use]
    pub fn with_source(mut self, id: SourceId, name: &str) -> Self {
        self.names.insert(id, name.to_string());
        self
    }

    /// Register a named scene with its active children.
    #[must_use]
    pub fn with_scene(mut self, id: SourceId, name: &str, children: &[SourceId]) -> Self {
        self.names.insert(id, name.to_string());
        self.children.insert(id, children.to_vec());
        self
    }

    /// Put `scene` on program output.
    pub fn set_program(&mut self, scene: SourceId) {
        self.program_scene = Some(scene);
    }

    /// Select a preview scene; `Some` implies studio mode.
    pub fn set_preview(&mut self, scene: Option<SourceId>) {
        self.studio_mode = scene.is_some();
        self.preview_scene = scene;
    }

    fn visit(&self, scene: SourceId, visitor: &mut dyn FnMut(SourceId), depth: usize) {
        // Guard against cyclic fixtures.
        if depth > 16 {
            return;
        }
        for &child in self.children.get(&scene).into_iter().flatten() {
            visitor(child);
            self.visit(child, visitor, depth + 1);
        }
    }
}

impl FrontendPort for ScriptedFrontend {
    fn source_name(&self, source: SourceId) -> Option<String> {
        self.names.get(&source).cloned()
    }

    fn current_scene(&self) -> Option<SourceId> {
        self.program_scene
    }

    fn current_preview_scene(&self) -> Option<SourceId> {
        if self.studio_mode {
            self.preview_scene
        } else {
            None
        }
    }

    fn preview_program_mode_active(&self) -> bool {
        self.studio_mode
    }

    fn transition_duration_ms(&self) -> i32 {
        self.transition_duration_ms
    }

    fn enum_active_children(&self, scene: SourceId, visitor: &mut dyn FnMut(SourceId)) {
        self.visit(scene, visitor, 0);
    }

    fn subscribe(&mut self, source: SourceId) {
        self.registry.add(source);
    }

    fn unsubscribe(&mut self, source: SourceId) {
        self.registry.remove(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LaunchContext;

    #[test]
    fn test_nested_children_are_visited() {
        let frontend = ScriptedFrontend::new()
            .with_scene(SourceId(10), "Outer", &[SourceId(11)])
            .with_scene(SourceId(11), "Inner", &[SourceId(1)]);

        let mut seen = Vec::new();
        frontend.enum_active_children(SourceId(10), &mut |id| seen.push(id));
        assert_eq!(seen, vec![SourceId(11), SourceId(1)]);
    }

    #[test]
    fn test_preview_hidden_outside_studio_mode() {
        let mut frontend = ScriptedFrontend::new();
        frontend.preview_scene = Some(SourceId(5));
        assert_eq!(frontend.current_preview_scene(), None);

        frontend.set_preview(Some(SourceId(5)));
        assert_eq!(frontend.current_preview_scene(), Some(SourceId(5)));
    }

    #[test]
    fn test_capture_launch_context() {
        let mut frontend = ScriptedFrontend::new()
            .with_source(SourceId(1), "cmd")
            .with_scene(SourceId(10), "Program", &[SourceId(1)])
            .with_scene(SourceId(20), "Preview", &[]);
        frontend.set_program(SourceId(10));

        let ctx = LaunchContext::capture(SourceId(1), &frontend);
        assert_eq!(ctx.current_scene.as_deref(), Some("Program"));
        assert_eq!(ctx.preview_scene, None);
        assert_eq!(ctx.source_name.as_deref(), Some("cmd"));
        assert_eq!(ctx.transition_duration_ms, Some(300));

        frontend.set_preview(Some(SourceId(20)));
        let ctx = LaunchContext::capture(SourceId(1), &frontend);
        assert_eq!(ctx.preview_scene.as_deref(), Some("Preview"));
    }
}
