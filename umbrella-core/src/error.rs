use thiserror::Error;

/// Reasons a probe run could not produce counts. Every variant is reported
/// to the scheduler as UNKNOWN.
#[derive(Error, Debug)]
pub enum ProbeError {
  #[error("network error: {0}")]
  Network(String),

  #[error("request timed out after {0}s")]
  Timeout(u64),

  #[error("authentication failed (HTTP {0})")]
  Auth(u16),

  #[error("unexpected HTTP status {0}")]
  HttpStatus(u16),

  #[error("malformed response: {0}")]
  Malformed(String),
}

impl ProbeError {
  /// Maps a non-success HTTP status to the failure class it belongs to.
  pub fn from_status(status: u16) -> Self {
    match status {
      401 | 403 => ProbeError::Auth(status),
      _ => ProbeError::HttpStatus(status),
    }
  }
}
