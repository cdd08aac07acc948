//! Identity and launch-context types shared by the host boundary and the runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ports::FrontendPort;

/// Environment variable carrying the program scene name.
pub const ENV_CURRENT_SCENE: &str = "OBS_CURRENT_SCENE";
/// Environment variable carrying the preview scene name (studio mode only).
pub const ENV_PREVIEW_SCENE: &str = "OBS_PREVIEW_SCENE";
/// Environment variable carrying the name of the element that fired.
pub const ENV_SOURCE_NAME: &str = "OBS_SOURCE_NAME";
/// Environment variable carrying the transition duration in milliseconds.
pub const ENV_TRANSITION_DURATION: &str = "OBS_TRANSITION_DURATION";

/// Opaque identity of a host element (a source or a scene).
///
/// Equality is reference identity on the host side: two ids compare equal
/// iff they name the same live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of the UI context at the moment a command is launched.
///
/// Absent fields are not exported to the child at all, rather than being
/// exported as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchContext {
    /// Name of the scene currently on program output.
    pub current_scene: Option<String>,
    /// Name of the scene in preview; `None` outside studio mode.
    pub preview_scene: Option<String>,
    /// Name of the element whose state change triggered the launch.
    pub source_name: Option<String>,
    /// Current transition duration in milliseconds.
    pub transition_duration_ms: Option<i32>,
}

impl LaunchContext {
    /// Capture the context for `source` from the host.
    pub fn capture(source: SourceId, frontend: &dyn FrontendPort) -> Self {
        let preview_scene = if frontend.preview_program_mode_active() {
            frontend
                .current_preview_scene()
                .and_then(|scene| frontend.source_name(scene))
        } else {
            None
        };

        Self {
            current_scene: frontend
                .current_scene()
                .and_then(|scene| frontend.source_name(scene)),
            preview_scene,
            source_name: frontend.source_name(source),
            transition_duration_ms: Some(frontend.transition_duration_ms()),
        }
    }

    /// Environment variables to set in the child, present fields only.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::with_capacity(4);
        if let Some(ref scene) = self.current_scene {
            vars.push((ENV_CURRENT_SCENE, scene.clone()));
        }
        if let Some(ref scene) = self.preview_scene {
            vars.push((ENV_PREVIEW_SCENE, scene.clone()));
        }
        if let Some(ref name) = self.source_name {
            vars.push((ENV_SOURCE_NAME, name.clone()));
        }
        if let Some(duration) = self.transition_duration_ms {
            vars.push((ENV_TRANSITION_DURATION, duration.to_string()));
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_vars_skip_absent_fields() {
        let ctx = LaunchContext {
            current_scene: Some("Main".to_string()),
            preview_scene: None,
            source_name: Some("cmd".to_string()),
            transition_duration_ms: Some(300),
        };

        let vars = ctx.env_vars();
        assert_eq!(
            vars,
            vec![
                (ENV_CURRENT_SCENE, "Main".to_string()),
                (ENV_SOURCE_NAME, "cmd".to_string()),
                (ENV_TRANSITION_DURATION, "300".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_context_exports_nothing() {
        assert!(LaunchContext::default().env_vars().is_empty());
    }

    #[test]
    fn test_source_id_display() {
        assert_eq!(SourceId(7).to_string(), "#7");
    }
}
