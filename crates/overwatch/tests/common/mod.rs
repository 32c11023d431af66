//! Common test utilities for Overwatch integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Isolated data directory and workspace for one test
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub workspace_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let data_dir = temp_dir.path().join(".overwatch");
        let workspace_dir = temp_dir.path().join("ops");

        std::fs::create_dir_all(&data_dir)?;

        Ok(Self {
            temp_dir,
            data_dir,
            workspace_dir,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    pub fn transcript_file(&self) -> PathBuf {
        self.data_dir.join("logs").join("transcript.jsonl")
    }

    /// Command pointed at the test environment, with no API key visible
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_overwatch"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("OVERWATCH_HOME", &self.data_dir);
        cmd.env_remove("OPENROUTER_API_KEY");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Config using the built-in tool host and a file transcript
    pub fn create_config(&self) -> anyhow::Result<()> {
        let config = serde_json::json!({
            "agent": {
                "model": "test/planner",
                "reviewer_model": "test/reviewer"
            },
            "toolhost": {
                "kind": "local",
                "workspace": self.workspace_dir.to_string_lossy(),
                "call_timeout_secs": 5
            },
            "transcript": {
                "kind": "file",
                "path": self.transcript_file().to_string_lossy()
            }
        });
        std::fs::write(self.config_file(), serde_json::to_string_pretty(&config)?)?;
        Ok(())
    }

    /// Lines of the transcript log
    pub fn transcript_lines(&self) -> Vec<serde_json::Value> {
        std::fs::read_to_string(self.transcript_file())
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("transcript line is JSON"))
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
