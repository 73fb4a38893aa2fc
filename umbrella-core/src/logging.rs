use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "check-umbrella.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Diagnostics go to stderr and, when configured, a daily rolling file.
/// Stdout is reserved for the plugin result line.
pub fn init(cfg: &LoggingConfig, verbosity: u8) -> anyhow::Result<()> {
  let directive = level_for_verbosity(&cfg.level, verbosity);
  let filter = tracing_subscriber::EnvFilter::try_new(&directive)
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .with_target(true);

  let file_layer = match cfg.dir.as_deref() {
    Some(dir) => {
      fs::create_dir_all(dir)?;
      cleanup_old_logs(dir, cfg.retention_days)?;

      let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
      let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
      let _ = FILE_GUARD.set(guard);

      Some(
        tracing_subscriber::fmt::layer()
          .with_ansi(false)
          .with_writer(file_writer)
          .with_target(true),
      )
    }
    None => None,
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(stderr_layer)
    .with(file_layer)
    .try_init()?;

  Ok(())
}

/// Each `-v` raises the level one step above the configured one.
pub fn level_for_verbosity(configured: &str, verbosity: u8) -> String {
  match verbosity {
    0 => configured.to_string(),
    1 => "info".to_string(),
    2 => "debug".to_string(),
    _ => "trace".to_string(),
  }
}

/// Deletes rotated plugin logs last modified before the retention window.
/// A retention of 0 keeps everything; an unreadable directory is skipped.
fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> anyhow::Result<()> {
  let Some(keep_for) = retention(retention_days) else {
    return Ok(());
  };
  let Ok(entries) = fs::read_dir(log_dir) else {
    return Ok(());
  };

  let now = SystemTime::now();
  let expired = entries
    .flatten()
    .filter(|entry| is_own_log(&entry.file_name().to_string_lossy()))
    .filter(|entry| {
      entry
        .metadata()
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| now.duration_since(modified).ok())
        .is_some_and(|age| age > keep_for)
    });

  for entry in expired {
    if let Err(e) = fs::remove_file(entry.path()) {
      tracing::debug!(path = %entry.path().display(), error = %e, "could not remove old log");
    }
  }

  Ok(())
}

fn retention(days: u64) -> Option<Duration> {
  (days > 0).then(|| Duration::from_secs(days.saturating_mul(86_400)))
}

/// `check-umbrella.log` itself or a dated rotation such as
/// `check-umbrella.log.2026-10-01`.
fn is_own_log(file_name: &str) -> bool {
  file_name
    .strip_prefix(LOG_FILE_NAME)
    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_overrides_configured_level() {
    assert_eq!(level_for_verbosity("warn", 0), "warn");
    assert_eq!(level_for_verbosity("umbrella_core=debug", 0), "umbrella_core=debug");
    assert_eq!(level_for_verbosity("warn", 1), "info");
    assert_eq!(level_for_verbosity("warn", 2), "debug");
    assert_eq!(level_for_verbosity("warn", 7), "trace");
  }

  #[test]
  fn only_rotated_plugin_logs_match() {
    assert!(is_own_log("check-umbrella.log"));
    assert!(is_own_log("check-umbrella.log.2026-10-01"));
    assert!(!is_own_log("check-umbrella.logs"));
    assert!(!is_own_log("old-check-umbrella.log"));
    assert!(!is_own_log("syslog"));
  }

  #[test]
  fn zero_retention_keeps_everything() {
    assert_eq!(retention(0), None);
    assert_eq!(retention(2), Some(Duration::from_secs(2 * 86_400)));
    assert!(retention(u64::MAX).is_some());
  }

  #[test]
  fn cleanup_keeps_fresh_logs() {
    let dir = std::env::temp_dir().join(format!("check-umbrella-logs-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let ours = dir.join("check-umbrella.log.2020-01-01");
    let other = dir.join("unrelated.log");
    fs::write(&ours, b"old").unwrap();
    fs::write(&other, b"old").unwrap();

    // Files were just written, so nothing is older than one day.
    cleanup_old_logs(&dir, 1).unwrap();
    assert!(ours.exists());
    assert!(other.exists());

    let _ = fs::remove_dir_all(&dir);
  }
}
