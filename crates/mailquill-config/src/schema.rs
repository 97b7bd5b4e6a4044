//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Keys accepted under `[probes.<key>]`.
pub const PROBE_SCOPES: [&str; 4] = ["gmail", "outlook", "yahoo", "generic"];

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub opener: OpenerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra selectors per provider key (see [`PROBE_SCOPES`]).
    #[serde(default)]
    pub probes: BTreeMap<String, ProbeOverrides>,
}

/// Which text generator backs the reply flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    #[default]
    OpenAI,
    Demo,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: GenerationBackend,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationBackend::default(),
            api_key: None,
            base_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_generation_timeout(),
        }
    }
}

impl GenerationConfig {
    /// API key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    400
}

fn default_generation_timeout() -> u64 {
    30
}

/// Reply/compose opener wait policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenerConfig {
    #[serde(default = "default_open_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_open_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl OpenerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_open_timeout_ms() -> u64 {
    8000
}

fn default_poll_interval_ms() -> u64 {
    16
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Stderr only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Selectors prepended to the built-in probes of one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOverrides {
    #[serde(default)]
    pub editors: Vec<String>,

    #[serde(default)]
    pub replies: Vec<String>,

    #[serde(default)]
    pub composes: Vec<String>,

    #[serde(default)]
    pub threads: Vec<String>,
}

impl ProbeOverrides {
    /// `(list name, selectors)` pairs in a fixed order.
    pub fn lists(&self) -> [(&'static str, &[String]); 4] {
        [
            ("editors", self.editors.as_slice()),
            ("replies", self.replies.as_slice()),
            ("composes", self.composes.as_slice()),
            ("threads", self.threads.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.lists().iter().all(|(_, list)| list.is_empty())
    }
}
