//! Configuration management for Overwatch
//!
//! Loads and saves the JSON configuration that wires the completion
//! provider, the tool host and the transcript store together.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir, expand_home, transcript_path, workspace_path};

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG IO ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("MALFORMED CONFIG: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Completion provider access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Orchestrator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_reviewer_model")]
    pub reviewer_model: String,
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            reviewer_model: default_reviewer_model(),
            context_window: default_context_window(),
            summary_limit: default_summary_limit(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "openai/gpt-4o".to_string()
}

fn default_reviewer_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_context_window() -> usize {
    10
}

fn default_summary_limit() -> usize {
    500
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

/// Which tool host backs the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolHostKind {
    /// MCP server spawned as a child process
    #[default]
    Mcp,
    /// Built-in tools confined to the workspace
    Local,
}

/// Tool host parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolHostConfig {
    #[serde(default)]
    pub kind: ToolHostKind,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
    /// Root for the local tool host; defaults under the data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl Default for ToolHostConfig {
    fn default() -> Self {
        Self {
            kind: ToolHostKind::default(),
            command: default_command(),
            args: default_args(),
            env: HashMap::new(),
            handshake_timeout_secs: default_handshake_timeout(),
            call_timeout_secs: default_call_timeout(),
            workspace: None,
        }
    }
}

fn default_command() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["pentest_mcp.py".to_string()]
}

fn default_handshake_timeout() -> u64 {
    30
}

fn default_call_timeout() -> u64 {
    120
}

/// Which transcript store keeps the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptKind {
    Memory,
    #[default]
    File,
}

/// Transcript store parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranscriptConfig {
    #[serde(default)]
    pub kind: TranscriptKind,
    /// Log file for the file-backed store; defaults under the data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub toolhost: ToolHostConfig,
    #[serde(default)]
    pub transcript: TranscriptConfig,
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location, falling back to defaults when absent
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("◆ NO CONFIG AT {:?}, USING DEFAULTS", path);
            return Ok(Config::default());
        }

        debug!("◆ READING CONFIG FROM {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("◆ WRITING CONFIG TO {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// API key from the config, else from `OPENROUTER_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        if !self.provider.api_key.is_empty() {
            return Some(self.provider.api_key.clone());
        }

        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Workspace for the local tool host, with `~` expanded
    pub fn workspace_path(&self) -> PathBuf {
        match &self.toolhost.workspace {
            Some(path) if !path.is_empty() => expand_home(path),
            _ => workspace_path(),
        }
    }

    /// Transcript log location for the file-backed store
    pub fn transcript_path(&self) -> PathBuf {
        match &self.transcript.path {
            Some(path) if !path.is_empty() => expand_home(path),
            _ => transcript_path(),
        }
    }
}

/// Write a default config (if none exists) and create the workspace
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("◆ CONFIG ALREADY PRESENT AT {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("◆ CONFIG WRITTEN TO {:?}", config_path);
    }

    let config = Config::load().await?;
    let workspace = config.workspace_path();
    tokio::fs::create_dir_all(&workspace).await?;
    info!("◆ WORKSPACE READY AT {:?}", workspace);

    Ok(config)
}
