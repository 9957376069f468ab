use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Search qualifier appended to the raw input, e.g. `in:login`.
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    pub per_page: Option<u32>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_base() -> String { "https://api.github.com".to_string() }
fn default_qualifier() -> String { "in:login".to_string() }
fn default_sort() -> String { "followers".to_string() }
fn default_user_agent() -> String { "gh-user-search".to_string() }
fn default_request_timeout() -> u64 { 10_000 }

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            qualifier: default_qualifier(),
            sort: default_sort(),
            per_page: None,
            user_agent: default_user_agent(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

fn default_debounce() -> u64 { 1000 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_log_file() -> String { "gh-user-search.log".to_string() }
fn default_filter() -> String { "gh_user_search=info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }
}
