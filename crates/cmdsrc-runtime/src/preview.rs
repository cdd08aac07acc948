//! Preview membership detection with enter/leave debouncing.

use cmdsrc_core::{FrontendPort, SourceId};

/// Edge produced when preview membership changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewTransition {
    Entered,
    Left,
}

/// Whether `source` is an active element of the current preview scene.
///
/// An absent preview scene (studio mode off) means "not in preview".
pub fn is_source_in_preview(source: SourceId, frontend: &dyn FrontendPort) -> bool {
    let Some(scene) = frontend.current_preview_scene() else {
        return false;
    };

    let mut found = false;
    frontend.enum_active_children(scene, &mut |child| {
        if child == source {
            found = true;
        }
    });
    found
}

/// Debounced preview state of one element.
///
/// Every call to [`recompute`](Self::recompute) or [`observe`](Self::observe)
/// compares against the previous observation; only changes produce a
/// transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewDetector {
    is_preview: bool,
    was_preview: bool,
}

impl PreviewDetector {
    pub const fn new() -> Self {
        Self {
            is_preview: false,
            was_preview: false,
        }
    }

    /// Current debounced membership.
    pub const fn is_preview(&self) -> bool {
        self.is_preview
    }

    /// Query the host and fold the result into the debounced state.
    pub fn recompute(
        &mut self,
        source: SourceId,
        frontend: &dyn FrontendPort,
    ) -> Option<PreviewTransition> {
        self.observe(is_source_in_preview(source, frontend))
    }

    /// Fold one raw observation into the debounced state.
    pub const fn observe(&mut self, in_preview: bool) -> Option<PreviewTransition> {
        self.is_preview = in_preview;
        let transition = match (self.was_preview, in_preview) {
            (false, true) => Some(PreviewTransition::Entered),
            (true, false) => Some(PreviewTransition::Left),
            _ => None,
        };
        self.was_preview = in_preview;
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdsrc_core::testing::ScriptedFrontend;

    const SELF_ID: SourceId = SourceId(1);
    const PREVIEW: SourceId = SourceId(20);

    #[test]
    fn test_debounce_sequence() {
        let mut detector = PreviewDetector::new();
        let observations = [false, false, true, true, false, true];
        let transitions: Vec<_> = observations
            .into_iter()
            .map(|seen| detector.observe(seen))
            .collect();

        assert_eq!(
            transitions,
            vec![
                None,
                None,
                Some(PreviewTransition::Entered),
                None,
                Some(PreviewTransition::Left),
                Some(PreviewTransition::Entered),
            ]
        );
    }

    #[test]
    fn test_absent_preview_scene_is_false() {
        let frontend = ScriptedFrontend::new().with_scene(PREVIEW, "Preview", &[SELF_ID]);
        let mut detector = PreviewDetector::new();

        for _ in 0..3 {
            assert!(!is_source_in_preview(SELF_ID, &frontend));
            assert_eq!(detector.recompute(SELF_ID, &frontend), None);
        }
        assert!(!detector.is_preview());
    }

    #[test]
    fn test_membership_follows_preview_scene() {
        let mut frontend = ScriptedFrontend::new()
            .with_scene(PREVIEW, "Preview", &[SourceId(2), SELF_ID])
            .with_scene(SourceId(30), "Other", &[SourceId(2)]);
        let mut detector = PreviewDetector::new();

        frontend.set_preview(Some(PREVIEW));
        assert_eq!(
            detector.recompute(SELF_ID, &frontend),
            Some(PreviewTransition::Entered)
        );
        assert!(detector.is_preview());

        frontend.set_preview(Some(SourceId(30)));
        assert_eq!(
            detector.recompute(SELF_ID, &frontend),
            Some(PreviewTransition::Left)
        );
        assert_eq!(detector.recompute(SELF_ID, &frontend), None);
    }

    #[test]
    fn test_nested_scene_counts_as_preview() {
        let mut frontend = ScriptedFrontend::new()
            .with_scene(PREVIEW, "Preview", &[SourceId(21)])
            .with_scene(SourceId(21), "Nested", &[SELF_ID]);
        frontend.set_preview(Some(PREVIEW));

        assert!(is_source_in_preview(SELF_ID, &frontend));
        assert!(!is_source_in_preview(SourceId(99), &frontend));
    }
}
