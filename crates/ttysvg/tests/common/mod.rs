#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A scratch directory plus a `ttysvg` command isolated from the caller's
/// environment.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes a recording into the scratch directory and returns the script
    /// and timing paths.
    pub fn session(&self, script: &[u8], timing: &str) -> (PathBuf, PathBuf) {
        let script_path = self.path("typescript");
        let timing_path = self.path("timing");
        std::fs::write(&script_path, script).expect("write script");
        std::fs::write(&timing_path, timing).expect("write timing");
        (script_path, timing_path)
    }

    pub fn cli_command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ttysvg"));
        cmd.env_remove("TTYSVG_CONFIG")
            .env_remove("TTYSVG_LOG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .current_dir(self.dir.path());
        cmd
    }
}
