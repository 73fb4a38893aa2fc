use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One blocked request as reported by the security activity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatEvent {
  #[serde(default)]
  pub origin_id: Option<OriginId>,

  #[serde(default, deserialize_with = "null_as_empty")]
  pub categories: Vec<String>,
}

impl ThreatEvent {
  pub fn new(origin_id: impl Into<OriginId>, categories: &[&str]) -> Self {
    Self {
      origin_id: Some(origin_id.into()),
      categories: categories.iter().map(|c| c.to_string()).collect(),
    }
  }
}

/// The API has shipped origin ids both as numbers and as strings. The id is
/// only logged, so any other JSON shape is kept as-is rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OriginId {
  Numeric(u64),
  Text(String),
  Other(serde_json::Value),
}

impl fmt::Display for OriginId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OriginId::Numeric(n) => write!(f, "{n}"),
      OriginId::Text(s) => f.write_str(s),
      OriginId::Other(v) => write!(f, "{v}"),
    }
  }
}

impl From<&str> for OriginId {
  fn from(s: &str) -> Self {
    OriginId::Text(s.to_string())
  }
}

impl From<u64> for OriginId {
  fn from(n: u64) -> Self {
    OriginId::Numeric(n)
  }
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn now_unix_s() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_secs()
}
