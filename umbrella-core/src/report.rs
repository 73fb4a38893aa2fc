use crate::aggregate::AggregationResult;
use crate::range::{RangeError, Threshold};
use std::fmt;

/// Prefix of every result line; existing service checks match on it.
pub const CHECK_NAME: &str = "CHECKCISCOUMBRELLA";

/// Plugin status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
  Ok,
  Warning,
  Critical,
  Unknown,
}

impl Status {
  pub fn exit_code(self) -> i32 {
    match self {
      Status::Ok => 0,
      Status::Warning => 1,
      Status::Critical => 2,
      Status::Unknown => 3,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Status::Ok => "OK",
      Status::Warning => "WARNING",
      Status::Critical => "CRITICAL",
      Status::Unknown => "UNKNOWN",
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thresholds {
  pub warning: Threshold,
  pub critical: Threshold,
}

impl Thresholds {
  pub fn parse(warning: &str, critical: &str) -> Result<Self, RangeError> {
    Ok(Self {
      warning: Threshold::parse(warning)?,
      critical: Threshold::parse(critical)?,
    })
  }

  /// Critical wins over warning when both ranges are violated.
  pub fn evaluate(&self, value: f64) -> Status {
    if self.critical.is_violated_by(value) {
      Status::Critical
    } else if self.warning.is_violated_by(value) {
      Status::Warning
    } else {
      Status::Ok
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
  Scalar(Thresholds),
  Informational,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
  pub name: &'static str,
  pub value: u64,
  pub evaluation: Evaluation,
}

impl Metric {
  pub fn status(&self) -> Status {
    match &self.evaluation {
      Evaluation::Scalar(t) => t.evaluate(self.value as f64),
      Evaluation::Informational => Status::Ok,
    }
  }

  /// `label=value;warn;crit;min`, with unset thresholds left empty.
  pub fn perfdata(&self) -> String {
    let (warn, crit) = match &self.evaluation {
      Evaluation::Scalar(t) => (t.warning.perfdata_field(), t.critical.perfdata_field()),
      Evaluation::Informational => ("", ""),
    };
    format!("{}={};{};{};0", quote_label(self.name), self.value, warn, crit)
  }
}

fn quote_label(label: &str) -> String {
  if label.contains([' ', '=', '\'']) {
    format!("'{}'", label.replace('\'', "''"))
  } else {
    label.to_string()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
  pub status: Status,
  pub summary: String,
  pub long_output: Vec<String>,
  pub metrics: Vec<Metric>,
}

impl CheckResult {
  /// Result for a run that could not complete.
  pub fn unknown(message: impl Into<String>) -> Self {
    Self {
      status: Status::Unknown,
      summary: message.into(),
      long_output: Vec::new(),
      metrics: Vec::new(),
    }
  }

  pub fn exit_code(&self) -> i32 {
    self.status.exit_code()
  }

  pub fn metric(&self, name: &str) -> Option<&Metric> {
    self.metrics.iter().find(|m| m.name == name)
  }
}

impl fmt::Display for CheckResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{CHECK_NAME} {} - {}", self.status, self.summary)?;
    if !self.metrics.is_empty() {
      let perf: Vec<String> = self.metrics.iter().map(Metric::perfdata).collect();
      write!(f, " | {}", perf.join(" "))?;
    }
    for line in &self.long_output {
      write!(f, "\n{line}")?;
    }
    Ok(())
  }
}

/// Builds the ten reported metrics and derives the overall status. Only the
/// `total` metric is checked against thresholds.
pub fn build_report(agg: &AggregationResult, thresholds: &Thresholds) -> CheckResult {
  let mut metrics = Vec::with_capacity(1 + agg.per_category().count());
  metrics.push(Metric {
    name: "total",
    value: agg.total,
    evaluation: Evaluation::Scalar(thresholds.clone()),
  });

  let mut long_output = Vec::new();
  for (category, count) in agg.per_category() {
    metrics.push(Metric {
      name: category.metric_name(),
      value: count,
      evaluation: Evaluation::Informational,
    });
    long_output.push(format!("{}: {count}", category.label()));
  }

  let status = metrics.iter().map(Metric::status).max().unwrap_or(Status::Ok);

  CheckResult {
    status,
    summary: format!("{} threat(s) blocked", agg.total),
    long_output,
    metrics,
  }
}
