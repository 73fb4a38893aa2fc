use crate::types::now_unix_s;

pub const DEFAULT_LOOKBACK_SECONDS: u64 = 300;

/// Query parameters for one security activity request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
  pub start: u64,
}

impl QueryWindow {
  /// Window ending now and reaching `lookback_seconds` into the past.
  pub fn trailing(lookback_seconds: u64) -> Self {
    Self::trailing_from(now_unix_s(), lookback_seconds)
  }

  pub fn trailing_from(now_unix_s: u64, lookback_seconds: u64) -> Self {
    Self {
      start: now_unix_s.saturating_sub(lookback_seconds),
    }
  }

  pub fn to_query_pairs(&self) -> [(&'static str, String); 1] {
    [("start", self.start.to_string())]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn start_is_now_minus_lookback() {
    let now = 1_700_000_000;
    assert_eq!(QueryWindow::trailing_from(now, 300).start, now - 300);
    assert_eq!(QueryWindow::trailing_from(now, 0).start, now);
  }

  #[test]
  fn shorter_lookback_never_moves_start_back() {
    let now = 1_700_000_000;
    let mut prev = 0;
    for lookback in (0..=3600).rev().step_by(60) {
      let start = QueryWindow::trailing_from(now, lookback).start;
      assert!(start >= prev);
      prev = start;
    }
  }

  #[test]
  fn lookback_before_epoch_saturates() {
    assert_eq!(QueryWindow::trailing_from(100, 500).start, 0);
  }

  #[test]
  fn query_pairs_carry_start() {
    let w = QueryWindow { start: 12345 };
    assert_eq!(w.to_query_pairs(), [("start", "12345".to_string())]);
  }
}
