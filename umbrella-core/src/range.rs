//! Threshold ranges in the usual monitoring-plugin notation:
//! `[@][start:][end]`. A bare `end` means `0:end`, an empty `end` means no
//! upper bound, `~` as `start` means no lower bound. A value outside the
//! range triggers the alert; a leading `@` triggers it inside instead.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Range {
  start: f64,
  end: f64,
  invert: bool,
  text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
  #[error("invalid number `{0}` in range")]
  Number(String),

  #[error("range start is greater than end in `{0}`")]
  StartAfterEnd(String),
}

impl Range {
  /// True when `value` does not trigger this range.
  pub fn contains(&self, value: f64) -> bool {
    let inside = self.start <= value && value <= self.end;
    inside != self.invert
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }
}

impl FromStr for Range {
  type Err = RangeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let text = s.trim();
    let (invert, spec) = match text.strip_prefix('@') {
      Some(rest) => (true, rest),
      None => (false, text),
    };
    let (start_raw, end_raw) = spec.split_once(':').unwrap_or(("", spec));

    let start = match start_raw {
      "~" => f64::NEG_INFINITY,
      "" => 0.0,
      raw => parse_bound(raw)?,
    };
    let end = match end_raw {
      "" => f64::INFINITY,
      raw => parse_bound(raw)?,
    };
    if start > end {
      return Err(RangeError::StartAfterEnd(text.to_string()));
    }

    Ok(Self {
      start,
      end,
      invert,
      text: text.to_string(),
    })
  }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

fn parse_bound(raw: &str) -> Result<f64, RangeError> {
  raw
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| RangeError::Number(raw.to_string()))
}

/// A warning or critical threshold. An empty expression never alerts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Threshold(Option<Range>);

impl Threshold {
  pub fn none() -> Self {
    Self(None)
  }

  pub fn parse(expr: &str) -> Result<Self, RangeError> {
    if expr.trim().is_empty() {
      return Ok(Self(None));
    }
    expr.parse().map(|r| Self(Some(r)))
  }

  pub fn is_violated_by(&self, value: f64) -> bool {
    self.0.as_ref().is_some_and(|r| !r.contains(value))
  }

  /// Text for the perfdata warn/crit field; empty when unset.
  pub fn perfdata_field(&self) -> &str {
    self.0.as_ref().map(Range::as_str).unwrap_or("")
  }
}
