use anyhow::Context;

use crate::config::ApiConfig;
use crate::error::ProbeError;
use crate::query::QueryWindow;
use reqwest::blocking::Client;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

pub mod fetch;
pub mod schema;

pub use schema::ActivityReport;

/// API key and secret, sent as HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
  pub key: String,
  pub secret: String,
}

impl Credentials {
  pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      secret: secret.into(),
    }
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("key", &self.key)
      .field("secret", &"<redacted>")
      .finish()
  }
}

/// Where security activity comes from. The HTTP client is the only
/// production implementation.
pub trait ActivitySource {
  fn fetch(&self, org: &str, window: &QueryWindow) -> Result<ActivityReport, ProbeError>;
}

pub struct UmbrellaClient {
  client: Client,
  base_url: Url,
  credentials: Credentials,
  timeout: Duration,
  max_response_bytes: usize,
}

impl UmbrellaClient {
  /// Fails only on configuration problems: a base URL that does not parse
  /// or cannot carry a path, or a client that cannot be built.
  pub fn new(api: &ApiConfig, credentials: Credentials, timeout: Duration) -> anyhow::Result<Self> {
    Self::build(api, credentials, timeout, true)
  }

  fn build(
    api: &ApiConfig,
    credentials: Credentials,
    timeout: Duration,
    https_only: bool,
  ) -> anyhow::Result<Self> {
    let base_url = Url::parse(&api.base_url)
      .with_context(|| format!("invalid api.base_url: {}", api.base_url))?;
    if base_url.cannot_be_a_base() {
      anyhow::bail!("api.base_url cannot be used as a base URL: {}", api.base_url);
    }
    let client = fetch::build_client(
      timeout,
      Duration::from_secs(api.connect_timeout_seconds),
      https_only,
    )?;
    Ok(Self {
      client,
      base_url,
      credentials,
      timeout,
      max_response_bytes: api.max_response_bytes,
    })
  }
}

impl ActivitySource for UmbrellaClient {
  fn fetch(&self, org: &str, window: &QueryWindow) -> Result<ActivityReport, ProbeError> {
    let url = fetch::security_activity_url(&self.base_url, org, window)?;
    tracing::info!(
      url = %fetch::safe_url_label(&url),
      start = window.start,
      timeout_secs = self.timeout.as_secs(),
      "querying security activity"
    );

    let body = fetch::get_json(
      &self.client,
      &url,
      &self.credentials.key,
      &self.credentials.secret,
      self.timeout,
      self.max_response_bytes,
    )?;
    tracing::debug!(bytes = body.len(), "security activity response received");

    schema::parse_report(&body)
  }
}

/// Serves a fixed report; used to run the pipeline without a network.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
  report: ActivityReport,
}

impl StaticSource {
  pub fn new(report: ActivityReport) -> Self {
    Self { report }
  }

  pub fn from_json(body: &[u8]) -> Result<Self, ProbeError> {
    schema::parse_report(body).map(Self::new)
  }
}

impl ActivitySource for StaticSource {
  fn fetch(&self, _org: &str, _window: &QueryWindow) -> Result<ActivityReport, ProbeError> {
    Ok(self.report.clone())
  }
}
