//! lastrun-core — turns Puppet's `last_run_summary.yaml` into Prometheus metrics.
//!
//! Provides:
//! - `report` — the decoded run report and its loader
//! - `descriptor` — the fixed set of exposed metric descriptors
//! - `collector` — the scrape-time collector, build info, filesystem access

pub mod collector;
pub mod descriptor;
pub mod report;

/// Crate version, reported by `--version` and the build_info metric.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source revision embedded at build time (`unknown` outside a git checkout).
pub const REVISION: &str = env!("LASTRUN_REVISION");

/// Default metric namespace.
pub const DEFAULT_NAMESPACE: &str = "puppet_last_run_exporter";

/// Default location of the run summary, relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "./last_run_summary.yaml";
