use crate::activity::ActivitySource;
use crate::aggregate;
use crate::error::ProbeError;
use crate::query::QueryWindow;
use crate::report::{self, CheckResult, Thresholds};
use crate::types::now_unix_s;

/// Per-invocation inputs of one check.
#[derive(Debug, Clone)]
pub struct CheckParams {
  pub org: String,
  pub lookback_seconds: u64,
  pub thresholds: Thresholds,
}

pub struct Probe<S> {
  source: S,
  params: CheckParams,
}

impl<S: ActivitySource> Probe<S> {
  pub fn new(source: S, params: CheckParams) -> Self {
    Self { source, params }
  }

  pub fn run(&self) -> Result<CheckResult, ProbeError> {
    self.run_at(now_unix_s())
  }

  /// Query, aggregate and report with `now` (unix seconds) as the window end.
  pub fn run_at(&self, now: u64) -> Result<CheckResult, ProbeError> {
    let window = QueryWindow::trailing_from(now, self.params.lookback_seconds);
    let report = self.source.fetch(&self.params.org, &window)?;

    let agg = aggregate::aggregate(&report.requests);
    tracing::info!(total = agg.total, start = window.start, "aggregated security activity");
    for event in &report.requests {
      tracing::trace!(
        origin_id = ?event.origin_id,
        categories = ?event.categories,
        "blocked request"
      );
    }

    Ok(report::build_report(&agg, &self.params.thresholds))
  }
}

/// Folds a failed run into the UNKNOWN result the scheduler expects.
pub fn into_result(outcome: Result<CheckResult, ProbeError>) -> CheckResult {
  match outcome {
    Ok(result) => result,
    Err(e) => {
      tracing::warn!(error = %e, "probe failed");
      CheckResult::unknown(format!("probe failed: {e}"))
    }
  }
}
