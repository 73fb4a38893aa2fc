use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that rarely change between invocations. Per-check values
/// (organization, credentials, window, thresholds, timeout) come from the
/// command line instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
  pub api: ApiConfig,
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,

  #[serde(default = "default_max_response_bytes")]
  pub max_response_bytes: usize,

  #[serde(default = "default_connect_timeout_seconds")]
  pub connect_timeout_seconds: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      max_response_bytes: default_max_response_bytes(),
      connect_timeout_seconds: default_connect_timeout_seconds(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default)]
  pub dir: Option<PathBuf>,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: None,
      retention_days: default_retention_days(),
    }
  }
}

fn default_base_url() -> String {
  "https://reports.api.umbrella.com/v1/".to_string()
}

fn default_max_response_bytes() -> usize {
  16 * 1024 * 1024
}

fn default_connect_timeout_seconds() -> u64 {
  10
}

fn default_log_level() -> String {
  "warn".to_string()
}

fn default_retention_days() -> u64 {
  14
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  #[serde(default)]
  pub api: Option<ApiConfig>,

  #[serde(default)]
  pub logging: Option<LoggingConfig>,
}

impl ConfigFile {
  fn normalize(self) -> Config {
    let mut cfg = Config::default();
    if let Some(a) = self.api {
      cfg.api = a;
    }
    if let Some(l) = self.logging {
      cfg.logging = l;
    }
    cfg
  }
}

/// Loads the optional configuration file. Without a path the defaults apply.
/// A path that cannot be read or parsed is an error: a probe must not
/// silently fall back to a different endpoint.
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
  let Some(path) = path else {
    return Ok(Config::default());
  };

  let raw = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
  parse(&raw).with_context(|| format!("parse config {}", path.display()))
}

pub fn parse(raw: &str) -> anyhow::Result<Config> {
  let cfg = toml::from_str::<ConfigFile>(raw)?.normalize();
  validate(&cfg)?;
  Ok(cfg)
}

pub fn validate(cfg: &Config) -> anyhow::Result<()> {
  if cfg.api.max_response_bytes == 0 {
    anyhow::bail!("api.max_response_bytes must be > 0");
  }
  if cfg.api.connect_timeout_seconds == 0 {
    anyhow::bail!("api.connect_timeout_seconds must be > 0");
  }

  let url = reqwest::Url::parse(&cfg.api.base_url)
    .with_context(|| format!("invalid api.base_url: {}", cfg.api.base_url))?;
  if url.scheme() != "https" {
    anyhow::bail!("api.base_url must use HTTPS: {}", cfg.api.base_url);
  }
  if url.host_str().is_none() {
    anyhow::bail!("api.base_url has no host: {}", cfg.api.base_url);
  }
  if url.cannot_be_a_base() {
    anyhow::bail!("api.base_url cannot be used as a base URL: {}", cfg.api.base_url);
  }

  Ok(())
}
