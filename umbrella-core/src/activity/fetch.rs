use crate::error::ProbeError;
use crate::query::QueryWindow;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Url;
use std::error::Error as _;
use std::io::{self, Read};
use std::time::Duration;

const JSON: &str = "application/json";

/// `https_only` is only relaxed for local test servers.
pub fn build_client(timeout: Duration, connect_timeout: Duration, https_only: bool) -> anyhow::Result<Client> {
  Client::builder()
    .timeout(timeout)
    .connect_timeout(connect_timeout)
    .redirect(Policy::none())
    .https_only(https_only)
    .build()
    .map_err(|e| anyhow::anyhow!("build HTTP client: {}", error_chain(&e)))
}

/// `{base}/organizations/{org}/security-activity?start=..`, with `org`
/// encoded as a single path segment.
pub fn security_activity_url(base: &Url, org: &str, window: &QueryWindow) -> Result<Url, ProbeError> {
  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|_| ProbeError::Network(format!("base URL cannot carry a path: {base}")))?
    .pop_if_empty()
    .push("organizations")
    .push(org)
    .push("security-activity");
  url.query_pairs_mut().clear().extend_pairs(window.to_query_pairs());
  Ok(url)
}

pub fn get_json(
  client: &Client,
  url: &Url,
  key: &str,
  secret: &str,
  timeout: Duration,
  max_bytes: usize,
) -> Result<Vec<u8>, ProbeError> {
  let response = client
    .get(url.clone())
    .basic_auth(key, Some(secret))
    .header(ACCEPT, JSON)
    .header(CONTENT_TYPE, JSON)
    .header(USER_AGENT, format!("check-umbrella/{}", env!("CARGO_PKG_VERSION")))
    .send()
    .map_err(|e| classify_send_error(e, url, timeout))?;

  let status = response.status();
  if !status.is_success() {
    tracing::debug!(status = status.as_u16(), url = %safe_url_label(url), "non-success response");
    return Err(ProbeError::from_status(status.as_u16()));
  }

  read_with_limit(response, max_bytes, timeout)
}

fn classify_send_error(e: reqwest::Error, url: &Url, timeout: Duration) -> ProbeError {
  if e.is_timeout() {
    return ProbeError::Timeout(timeout.as_secs());
  }
  ProbeError::Network(format!("GET {}: {}", safe_url_label(url), error_chain(&e.without_url())))
}

/// The client timeout also bounds the body read, so a stalled body is a
/// timeout like a stalled connect.
pub(crate) fn read_with_limit(
  reader: impl Read,
  max_bytes: usize,
  timeout: Duration,
) -> Result<Vec<u8>, ProbeError> {
  let mut out = Vec::new();
  reader
    .take((max_bytes.saturating_add(1)) as u64)
    .read_to_end(&mut out)
    .map_err(|e| {
      if is_timeout(&e) {
        ProbeError::Timeout(timeout.as_secs())
      } else {
        ProbeError::Network(format!("read response body: {e}"))
      }
    })?;

  if out.len() > max_bytes {
    return Err(ProbeError::Malformed(format!(
      "response exceeds max size {max_bytes} bytes"
    )));
  }

  Ok(out)
}

fn is_timeout(e: &io::Error) -> bool {
  e.kind() == io::ErrorKind::TimedOut
    || e
      .get_ref()
      .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
      .is_some_and(reqwest::Error::is_timeout)
}

/// Host and path for logs: never the query string or credentials.
pub fn safe_url_label(url: &Url) -> String {
  format!("{}{}", url.host_str().unwrap_or("<no-host>"), url.path())
}

fn error_chain(e: &reqwest::Error) -> String {
  let mut text = e.to_string();
  let mut source = e.source();
  while let Some(cause) = source {
    text.push_str(": ");
    text.push_str(&cause.to_string());
    source = cause.source();
  }
  text
}
