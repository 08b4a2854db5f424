//! Test support utilities for devsecrets integration tests.
//!
//! Provides isolated project/home directories, binary helpers, and
//! in-memory doubles for the engine's collaborators.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod doubles;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary project dir and home dir. Child
/// processes use `.current_dir()` so tests can run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory; the default script lives here
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with `devsecrets.json` written.
    pub fn with_manifest(json: &str) -> Self {
        let t = Self::new();
        t.write_manifest(json);
        t
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join(MANIFEST_FILE)
    }

    /// The default script location, `~/.devsecrets.sh`.
    pub fn script_path(&self) -> PathBuf {
        self.home.path().join(".devsecrets.sh")
    }

    pub fn write_manifest(&self, json: &str) {
        std::fs::write(self.manifest_path(), json).expect("failed to write manifest");
    }

    pub fn write_script(&self, contents: &str) {
        std::fs::write(self.script_path(), contents).expect("failed to write script");
    }

    pub fn read_script(&self) -> String {
        std::fs::read_to_string(self.script_path()).expect("failed to read script")
    }

    pub fn script_exists(&self) -> bool {
        self.script_path().exists()
    }

    /// Make the manifest newer than the script, as if it had just been edited.
    pub fn touch_manifest_after_script(&self) {
        let script = std::fs::metadata(self.script_path())
            .and_then(|m| m.modified())
            .expect("script has no mtime");
        set_mtime(&self.manifest_path(), script + Duration::from_secs(10));
    }
}

/// Set a file's modification time.
pub fn set_mtime(path: &std::path::Path, time: std::time::SystemTime) {
    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .expect("failed to open file");
    file.set_modified(time).expect("failed to set mtime");
}
