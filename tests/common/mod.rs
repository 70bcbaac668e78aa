//! Shared helpers for driving the `issue-agent` binary.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated config home plus an output directory.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    out_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let out_dir = root.path().join("work");
        fs::create_dir_all(&out_dir).expect("Failed to create test output directory");
        Self { root, out_dir }
    }

    /// Value used for `ISSUE_AGENT_HOME`.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Command with a clean environment, running inside the output directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("issue-agent").expect("Failed to locate issue-agent binary");
        cmd.current_dir(&self.out_dir)
            .env("ISSUE_AGENT_HOME", self.home())
            .env_remove("ISSUE_BODY")
            .env_remove("GEMINI_API_KEY")
            .env_remove("GEMINI_API_BASE")
            .env_remove("ISSUE_AGENT_STUB_RESPONSE")
            .env("RUST_LOG", "warn");
        cmd
    }

    /// Command with no config home of any kind.
    pub fn homeless_cli(&self) -> Command {
        let mut cmd = self.cli();
        cmd.env_remove("ISSUE_AGENT_HOME")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("HOME");
        cmd
    }

    /// Command wired to the stub provider answering with `reply`.
    pub fn stub_cli(&self, reply: &str) -> Command {
        let mut cmd = self.cli();
        cmd.arg("--provider").arg("stub").env("ISSUE_AGENT_STUB_RESPONSE", reply);
        cmd
    }

    pub fn write_config(&self, body: &str) {
        let dir = self.home().join("config");
        fs::create_dir_all(&dir).expect("Failed to create config dir");
        fs::write(dir.join("config.toml"), body).expect("Failed to write config");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.out_dir.join(rel)).unwrap_or_else(|e| panic!("read {rel}: {e}"))
    }

    pub fn file_count(&self) -> usize {
        fn walk(dir: &Path) -> usize {
            fs::read_dir(dir)
                .expect("read_dir")
                .map(|e| e.expect("dir entry").path())
                .map(|p| if p.is_dir() { walk(&p) } else { 1 })
                .sum()
        }
        walk(&self.out_dir)
    }
}
