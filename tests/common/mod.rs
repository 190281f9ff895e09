//! Common utilities for gemcode CLI integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test configuration for integration tests
pub struct TestConfig {
    pub temp_dir: TempDir,
}

impl TestConfig {
    /// Create a new test configuration with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get the path to the temporary directory
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a sandbox working directory under the temp dir
    pub fn create_working_dir(&self, name: &str) -> PathBuf {
        let dir = self.temp_path().join(name);
        fs::create_dir_all(&dir).expect("Failed to create working dir");
        dir
    }

    /// Build a gemcode command running inside the temp dir, with no API
    /// key in the environment (and no .env file in reach).
    pub fn gemcode_command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_gemcode"));
        command
            .current_dir(self.temp_path())
            .env_remove("GEMINI_API_KEY")
            .env_remove("GEMCODE_MODEL")
            .env_remove("GEMCODE_LOG_TO_FILE");
        command
    }
}
