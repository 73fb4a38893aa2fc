pub mod activity;
pub mod aggregate;
pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod range;
pub mod report;
pub mod taxonomy;
pub mod types;

pub use activity::{ActivitySource, Credentials, UmbrellaClient};
pub use check::{CheckParams, Probe};
pub use error::ProbeError;
pub use report::{CheckResult, Status, Thresholds};
