//! Application configuration
//!
//! Layered: built-in defaults, then an optional YAML file, then environment
//! variables prefixed `SMISH_SENTINEL_` with `__` between nested keys
//! (e.g. `SMISH_SENTINEL_GATEWAY__MODEL`).

use crate::analyzer::{RiskScorer, ScorerOptions, DEFAULT_BASE_SCORE};
use crate::normalizer::AssessmentNormalizer;
use crate::rules::{default_signals, load_signals_from_file};
use crate::Engine;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/sentinel.yaml";
pub const ENV_PREFIX: &str = "SMISH_SENTINEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_base_score")]
    pub base_score: u8,
    /// Penalise senders that are not in the user's contacts
    #[serde(default = "default_true")]
    pub unknown_sender_penalty: bool,
    /// YAML signal list replacing the built-in set
    #[serde(default)]
    pub signals_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Derive the level from the score instead of trusting the classifier's label
    #[serde(default)]
    pub reconcile_level: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub default_engine: Engine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Days to keep saved analyses; 0 keeps them forever
    #[serde(default)]
    pub retention_days: u32,
}

fn default_true() -> bool {
    true
}
fn default_base_score() -> u8 {
    DEFAULT_BASE_SCORE
}
fn default_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}
fn default_model() -> String {
    "google/gemini-3-flash-preview".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_listen() -> String {
    "127.0.0.1:8380".to_string()
}
fn default_db_path() -> String {
    "~/.smish-sentinel/sentinel.db".to_string()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: default_base_score(),
            unknown_sender_penalty: default_true(),
            signals_path: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            default_engine: Engine::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            retention_days: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration. A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        if path.exists() {
            info!("Loading configuration from {}", path.display());
        }

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("invalid configuration")
    }
}

impl ScoringConfig {
    /// Build the scorer, loading the signal file when one is configured
    pub fn build_scorer(&self) -> anyhow::Result<RiskScorer> {
        let signals = match self.signals_path {
            Some(ref p) => {
                let path = expand_home(p);
                load_signals_from_file(&path)
                    .with_context(|| format!("failed to load signals from {}", path.display()))?
            }
            None => default_signals(),
        };

        Ok(RiskScorer::new(
            signals,
            ScorerOptions {
                base_score: self.base_score,
                unknown_sender_penalty: self.unknown_sender_penalty,
            },
        ))
    }
}

impl NormalizerConfig {
    pub fn build_normalizer(&self) -> AssessmentNormalizer {
        AssessmentNormalizer::new().with_level_reconciliation(self.reconcile_level)
    }
}

impl StorageConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_home(&self.db_path)
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
