// src/config.rs
//! Cycle parameters and per-source overrides.
//!
//! Lookup order: `$AGGREGATOR_CONFIG_PATH` → `config/aggregator.toml` →
//! `config/aggregator.json` → built-in defaults. Env overrides apply last.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "AGGREGATOR_CONFIG_PATH";
pub const ENV_MAX_WORKERS: &str = "AGGREGATOR_MAX_WORKERS";
pub const ENV_TIMEOUT_SECS: &str = "AGGREGATOR_TIMEOUT_SECS";
pub const ENV_BATCH_CAP: &str = "AGGREGATOR_BATCH_CAP";

pub const DEFAULT_BATCH_CAP: usize = 30;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn default_max_workers() -> usize {
    4
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_batch_cap() -> usize {
    DEFAULT_BATCH_CAP
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOverride {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Replaces the outlet's built-in rotation list when set.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl Default for SourceOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            categories: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Fetch concurrency bound.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_timeout_secs")]
    pub per_source_timeout_secs: u64,
    #[serde(default = "default_batch_cap")]
    pub batch_cap: usize,
    /// HTTP request timeout used by live extractors.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceOverride>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            per_source_timeout_secs: default_timeout_secs(),
            batch_cap: default_batch_cap(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            sources: BTreeMap::new(),
        }
    }
}

impl AggregatorConfig {
    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_secs(self.per_source_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn source(&self, id: &str) -> SourceOverride {
        self.sources.get(id).cloned().unwrap_or_default()
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.source(id).enabled
    }

    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading aggregator config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// File lookup chain plus env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let toml_p = PathBuf::from("config/aggregator.toml");
                let json_p = PathBuf::from("config/aggregator.json");
                if toml_p.exists() {
                    Self::load_from(&toml_p)?
                } else if json_p.exists() {
                    Self::load_from(&json_p)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg.sanitized())
    }

    /// Unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_env::<usize>(ENV_MAX_WORKERS) {
            self.max_workers = v;
        }
        if let Some(v) = parse_env::<u64>(ENV_TIMEOUT_SECS) {
            self.per_source_timeout_secs = v;
        }
        if let Some(v) = parse_env::<usize>(ENV_BATCH_CAP) {
            self.batch_cap = v;
        }
    }

    fn sanitized(mut self) -> Self {
        self.max_workers = self.max_workers.max(1);
        self.per_source_timeout_secs = self.per_source_timeout_secs.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        for o in self.sources.values_mut() {
            if let Some(cats) = o.categories.take() {
                let cleaned: Vec<String> = cats
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
                o.categories = Some(cleaned);
            }
        }
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AggregatorConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    if hint_ext == "toml" {
        return toml::from_str(s).context("invalid TOML config");
    }
    // Unknown extension: try JSON, then TOML.
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    toml::from_str(s).map_err(|e| anyhow!("unsupported config format: {e}"))
}
