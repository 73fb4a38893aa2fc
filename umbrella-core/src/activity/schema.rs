use crate::error::ProbeError;
use crate::types::{null_as_empty, ThreatEvent};
use serde::{Deserialize, Serialize};

/// Body of a security activity report. Only `requests` is read; a missing or
/// `null` list is an empty window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
  #[serde(default, deserialize_with = "null_as_empty")]
  pub requests: Vec<ThreatEvent>,
}

pub fn parse_report(body: &[u8]) -> Result<ActivityReport, ProbeError> {
  let value: serde_json::Value =
    serde_json::from_slice(body).map_err(|e| ProbeError::Malformed(format!("invalid JSON: {e}")))?;
  if !value.is_object() {
    return Err(ProbeError::Malformed(format!(
      "expected a JSON object, got {}",
      json_kind(&value)
    )));
  }
  serde_json::from_value(value).map_err(|e| ProbeError::Malformed(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_requests() {
    let body = br#"{"requests": [
      {"originId":"a","categories":["Malware"]},
      {"originId":"b","categories":["Malware","Phishing"]},
      {"originId":"c","categories":["Unknown"]}
    ]}"#;
    let report = parse_report(body).unwrap();
    assert_eq!(report.requests.len(), 3);
    assert_eq!(report.requests[1].categories, vec!["Malware", "Phishing"]);
  }

  #[test]
  fn missing_or_null_requests_is_empty() {
    assert!(parse_report(b"{}").unwrap().requests.is_empty());
    assert!(parse_report(br#"{"requests":null}"#).unwrap().requests.is_empty());
    assert!(parse_report(br#"{"requests":[]}"#).unwrap().requests.is_empty());
  }

  #[test]
  fn odd_origin_ids_still_count() {
    for origin in ["-7", "12.0", r#"{"id":1}"#, "true"] {
      let body = format!(r#"{{"requests":[{{"originId":{origin},"categories":["Malware"]}},{{"categories":[]}}]}}"#);
      let report = parse_report(body.as_bytes()).unwrap();
      assert_eq!(report.requests.len(), 2, "originId {origin}");
      assert_eq!(report.requests[0].categories, vec!["Malware"]);
    }
  }

  #[test]
  fn malformed_bodies_are_rejected() {
    assert!(matches!(parse_report(b"<html>"), Err(ProbeError::Malformed(_))));
    assert!(matches!(parse_report(b"[]"), Err(ProbeError::Malformed(_))));
    assert!(matches!(
      parse_report(br#"{"requests":{"originId":"a"}}"#),
      Err(ProbeError::Malformed(_))
    ));
    assert!(matches!(
      parse_report(br#"{"requests":[{"categories":"Malware"}]}"#),
      Err(ProbeError::Malformed(_))
    ));
  }

  #[test]
  fn non_object_message_names_the_kind() {
    let err = parse_report(b"42").unwrap_err();
    assert_eq!(err.to_string(), "malformed response: expected a JSON object, got a number");
  }
}
