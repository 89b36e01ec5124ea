//! Configuration management for commentlens.
//!
//! Settings come from three layers, later layers winning: built-in
//! defaults, an optional TOML config file, and environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_ANALYSIS_PROMPT;

/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "COMMENTLENS_MODEL";
/// Environment variable overriding the Ollama binary.
pub const ENV_OLLAMA_BIN: &str = "COMMENTLENS_OLLAMA_BIN";
/// Environment variable overriding the invocation timeout.
pub const ENV_TIMEOUT_SECS: &str = "COMMENTLENS_TIMEOUT_SECS";

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Web server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Configuration for the LLM invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama binary name or path (default: ollama)
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Model to run (default: llama3)
    #[serde(default = "default_model")]
    pub model: String,
    /// Ceiling on a single model invocation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum characters of comment text to send to the model
    #[serde(default = "default_max_comment_chars")]
    pub max_comment_chars: usize,
    /// Custom analysis prompt (uses a {comments} placeholder)
    #[serde(default)]
    pub analysis_prompt: Option<String>,
}

fn default_binary() -> String {
    "ollama".to_string()
}
fn default_model() -> String {
    "llama3".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_comment_chars() -> usize {
    12000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_comment_chars: default_max_comment_chars(),
            analysis_prompt: None,
        }
    }
}

impl LlmConfig {
    /// Get the analysis prompt template, using custom or default.
    pub fn get_analysis_prompt(&self) -> &str {
        self.analysis_prompt
            .as_deref()
            .unwrap_or(DEFAULT_ANALYSIS_PROMPT)
    }
}

/// Load settings from an optional explicit config path.
///
/// With no explicit path, falls back to the user config directory
/// (`~/.config/commentlens/config.toml` on Linux) when that file exists,
/// otherwise defaults. Environment overrides are applied last.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(p) => read_settings_file(p)
            .with_context(|| format!("failed to load config from {}", p.display()))?,
        None => match default_config_path() {
            Some(p) if p.exists() => read_settings_file(&p)
                .with_context(|| format!("failed to load config from {}", p.display()))?,
            _ => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Default config file location under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("commentlens").join("config.toml"))
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = std::fs::read_to_string(path)?;
    let settings = toml::from_str(&raw)?;
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) -> anyhow::Result<()> {
    if let Ok(model) = std::env::var(ENV_MODEL) {
        if !model.trim().is_empty() {
            settings.llm.model = model;
        }
    }
    if let Ok(binary) = std::env::var(ENV_OLLAMA_BIN) {
        if !binary.trim().is_empty() {
            settings.llm.binary = binary;
        }
    }
    if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
        let secs: u64 = timeout
            .parse()
            .with_context(|| format!("{} must be an integer, got {:?}", ENV_TIMEOUT_SECS, timeout))?;
        settings.llm.timeout_secs = secs;
    }
    Ok(())
}
