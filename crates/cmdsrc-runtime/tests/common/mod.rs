//! Shared helpers for command source integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, Instant};

use cmdsrc_core::SourceId;
use cmdsrc_core::testing::ScriptedFrontend;
use cmdsrc_runtime::CommandSource;
use tracing_subscriber::EnvFilter;

pub const SOURCE: SourceId = SourceId(1);
pub const PROGRAM: SourceId = SourceId(10);
pub const PREVIEW: SourceId = SourceId(20);

/// Route `tracing` output to the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A program scene and a preview scene, both containing the source.
pub fn scene_graph() -> ScriptedFrontend {
    let mut frontend = ScriptedFrontend::new()
        .with_source(SOURCE, "Command Source")
        .with_scene(PROGRAM, "Live", &[SOURCE])
        .with_scene(PREVIEW, "Next Up", &[SOURCE]);
    frontend.set_program(PROGRAM);
    frontend
}

/// Tick `source` until `done` holds or five seconds pass.
pub fn tick_until(source: &mut CommandSource, mut done: impl FnMut(&CommandSource) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        source.tick();
        if done(source) {
            return true;
        }
        sleep(Duration::from_millis(20));
    }
    false
}

/// Wait for a file written by a child process.
pub fn wait_for_file(path: &Path) -> Option<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Ok(contents) = std::fs::read_to_string(path) {
            return Some(contents);
        }
        sleep(Duration::from_millis(20));
    }
    None
}
