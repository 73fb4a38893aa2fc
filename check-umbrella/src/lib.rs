use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use umbrella_core::check::{self, CheckParams};
use umbrella_core::query::DEFAULT_LOOKBACK_SECONDS;
use umbrella_core::{config, logging};
use umbrella_core::{CheckResult, Credentials, Probe, Thresholds, UmbrellaClient};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Blocked threats from the Cisco Umbrella security activity report.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
  name = "check_umbrella",
  version,
  after_help = "API doc: https://docs.umbrella.com/umbrella-api/docs/security-activity-report"
)]
pub struct Cli {
  /// Organization ID
  #[arg(short = 'o', long = "org", value_name = "ID")]
  pub org: String,

  /// API key
  #[arg(short = 'k', long = "key", env = "UMBRELLA_API_KEY", hide_env_values = true)]
  pub key: String,

  /// API key secret
  #[arg(short = 's', long = "secret", env = "UMBRELLA_API_SECRET", hide_env_values = true)]
  pub secret: String,

  /// How many seconds back to begin the query
  #[arg(short = 'T', long = "time", value_name = "SECONDS", default_value_t = DEFAULT_LOOKBACK_SECONDS)]
  pub time: u64,

  /// Warning range for the total number of blocked threats
  #[arg(short = 'w', long = "warning", value_name = "RANGE", default_value = "", allow_hyphen_values = true)]
  pub warning: String,

  /// Critical range for the total number of blocked threats
  #[arg(short = 'c', long = "critical", value_name = "RANGE", default_value = "", allow_hyphen_values = true)]
  pub critical: String,

  /// Increase log output on stderr (repeatable)
  #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
  pub verbose: u8,

  /// Request timeout in seconds
  #[arg(
    short = 't',
    long = "timeout",
    value_name = "SECONDS",
    default_value_t = DEFAULT_TIMEOUT_SECONDS,
    value_parser = clap::value_parser!(u64).range(1..)
  )]
  pub timeout: u64,

  /// Optional TOML file with API and logging settings
  #[arg(long = "config", value_name = "PATH")]
  pub config: Option<PathBuf>,
}

/// Help and version are printed by clap and exit 0. Any other argument
/// problem is an UNKNOWN result so the scheduler never sees clap's exit 2,
/// which it would read as CRITICAL.
pub fn parse_error_result(e: &clap::Error) -> Option<CheckResult> {
  match e.kind() {
    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
    _ => {
      let rendered = e.to_string();
      let head = rendered.split("\n\n").next().unwrap_or_default();
      let flat = head.split_whitespace().collect::<Vec<_>>().join(" ");
      let message = flat.strip_prefix("error: ").unwrap_or(&flat);
      Some(CheckResult::unknown(format!("invalid arguments: {message}")))
    }
  }
}

pub fn check_params(cli: &Cli) -> anyhow::Result<CheckParams> {
  let thresholds = Thresholds::parse(&cli.warning, &cli.critical).context("invalid threshold range")?;
  Ok(CheckParams {
    org: cli.org.clone(),
    lookback_seconds: cli.time,
    thresholds,
  })
}

/// Runs one check. Never fails: every error becomes an UNKNOWN result.
pub fn run(cli: &Cli) -> CheckResult {
  match try_run(cli) {
    Ok(result) => result,
    Err(e) => CheckResult::unknown(format!("{e:#}")),
  }
}

fn try_run(cli: &Cli) -> anyhow::Result<CheckResult> {
  let cfg = config::load(cli.config.as_deref())?;
  logging::init(&cfg.logging, cli.verbose).context("initialize logging")?;

  let params = check_params(cli)?;
  tracing::debug!(
    org = %params.org,
    lookback_seconds = params.lookback_seconds,
    warning = params.thresholds.warning.perfdata_field(),
    critical = params.thresholds.critical.perfdata_field(),
    "starting check"
  );

  let credentials = Credentials::new(cli.key.clone(), cli.secret.clone());
  let client = UmbrellaClient::new(&cfg.api, credentials, Duration::from_secs(cli.timeout))
    .context("configure API client")?;

  Ok(check::into_result(Probe::new(client, params).run()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use umbrella_core::Status;

  fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("check_umbrella").chain(args.iter().copied()))
  }

  #[test]
  fn defaults() {
    let cli = parse(&["-o", "123", "-k", "key", "-s", "secret"]).unwrap();
    assert_eq!(cli.org, "123");
    assert_eq!(cli.time, 300);
    assert_eq!(cli.timeout, 30);
    assert_eq!(cli.warning, "");
    assert_eq!(cli.critical, "");
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
  }

  #[test]
  fn long_flags_and_repeated_verbose() {
    let cli = parse(&[
      "--org", "9", "--key", "k", "--secret", "s", "--time", "600", "--warning", "10", "--critical",
      "20", "--timeout", "5", "-vvv",
    ])
    .unwrap();
    assert_eq!(cli.time, 600);
    assert_eq!(cli.warning, "10");
    assert_eq!(cli.critical, "20");
    assert_eq!(cli.timeout, 5);
    assert_eq!(cli.verbose, 3);
  }

  #[test]
  fn short_time_and_timeout_are_distinct() {
    let cli = parse(&["-o", "1", "-k", "k", "-s", "s", "-T", "60", "-t", "10"]).unwrap();
    assert_eq!(cli.time, 60);
    assert_eq!(cli.timeout, 10);
  }

  #[test]
  fn missing_org_is_unknown() {
    let err = parse(&["-k", "k", "-s", "s"]).unwrap_err();
    let result = parse_error_result(&err).unwrap();
    assert_eq!(result.status, Status::Unknown);
    assert!(result.summary.starts_with("invalid arguments: "));
    assert!(result.summary.contains("--org"));
  }

  #[test]
  fn bad_numbers_are_rejected() {
    for args in [
      &["-o", "1", "-k", "k", "-s", "s", "-T", "-5"][..],
      &["-o", "1", "-k", "k", "-s", "s", "-T", "abc"][..],
      &["-o", "1", "-k", "k", "-s", "s", "-t", "0"][..],
    ] {
      let err = parse(args).unwrap_err();
      assert_eq!(parse_error_result(&err).map(|r| r.exit_code()), Some(3));
    }
  }

  #[test]
  fn version_and_help_are_not_results() {
    let err = parse(&["-V"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    assert!(parse_error_result(&err).is_none());

    let err = parse(&["--help"]).unwrap_err();
    assert!(parse_error_result(&err).is_none());
  }

  #[test]
  fn params_carry_thresholds() {
    let cli = parse(&["-o", "1", "-k", "k", "-s", "s", "-w", "0:10", "-c", "0:20", "-T", "120"]).unwrap();
    let params = check_params(&cli).unwrap();
    assert_eq!(params.org, "1");
    assert_eq!(params.lookback_seconds, 120);
    assert_eq!(params.thresholds.evaluate(15.0), Status::Warning);
  }

  #[test]
  fn bad_range_is_an_error() {
    let cli = parse(&["-o", "1", "-k", "k", "-s", "s", "-w", "20:10"]).unwrap();
    let err = check_params(&cli).unwrap_err();
    assert!(format!("{err:#}").starts_with("invalid threshold range: "));
  }

  #[test]
  fn unreadable_config_is_unknown() {
    let path = std::env::temp_dir().join("check-umbrella-missing-config.toml");
    let path_arg = path.to_string_lossy().to_string();
    let cli = parse(&["-o", "1", "-k", "k", "-s", "s", "--config", &path_arg]).unwrap();
    let result = run(&cli);
    assert_eq!(result.status, Status::Unknown);
    assert!(result.summary.starts_with("read config "));
  }
}
