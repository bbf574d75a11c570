//! Pre-built run summaries for testing.
//!
//! These scenarios provide realistic `last_run_summary.yaml` contents for
//! healthy, failing, partial and broken agent runs.

use super::filesystem::MockFs;

impl MockFs {
    /// Path every scenario writes its summary to.
    pub const REPORT_PATH: &'static str =
        "/opt/puppetlabs/puppet/cache/state/last_run_summary.yaml";

    /// A clean agent run: a couple of changes, nothing failed.
    pub const TYPICAL_RUN: &'static str = "\
---
version:
  config: 1600000000
  puppet: 6.19.1
resources:
  changed: 2
  corrective_change: 1
  failed: 0
  failed_to_restart: 0
  out_of_sync: 2
  restarted: 1
  scheduled: 0
  skipped: 0
  total: 210
time:
  anchor: 0.000412
  catalog_application: 2.183921
  config_retrieval: 1.024771
  convert_catalog: 0.311026
  exec: 0.420118
  fact_generation: 0.987143
  file: 0.532201
  filebucket: 0.000113
  node_retrieval: 0.201554
  package: 0.130772
  plugin_sync: 0.811732
  schedule: 0.000587
  service: 0.250004
  transaction_evaluation: 1.827004
  total: 6.412337
  user: 0.001254
  last_run: 1600000000
changes:
  total: 2
events:
  failure: 0
  success: 2
  total: 2
";

    /// A run where resources failed and a service could not be restarted.
    pub const FAILED_RUN: &'static str = "\
---
version:
  config: production-5f3a2c1
  puppet: 7.24.0
resources:
  changed: 1
  corrective_change: 0
  failed: 3
  failed_to_restart: 1
  out_of_sync: 4
  restarted: 0
  scheduled: 0
  skipped: 2
  total: 187
time:
  catalog_application: 4.5
  config_retrieval: 2.25
  convert_catalog: 0.125
  fact_generation: 1.75
  filebucket: 0.0
  node_retrieval: 0.5
  plugin_sync: 1.0
  transaction_evaluation: 3.75
  total: 9.875
  last_run: 1700000123
changes:
  total: 1
events:
  failure: 3
  success: 1
  total: 4
";

    /// An older agent that only writes a subset of the fields.
    pub const PARTIAL_RUN: &'static str = "\
---
resources:
  failed: 0
  total: 12
time:
  config_retrieval: 0.75
  total: 1.5
  last_run: 1400000000
";

    /// A summary cut off in the middle of a write.
    pub const MALFORMED_RUN: &'static str = "\
---
resources:
  changed: 2
  total: [210
time
";

    /// Creates a filesystem holding `content` at [`MockFs::REPORT_PATH`].
    pub fn with_report(content: &str) -> Self {
        let fs = Self::new();
        fs.add_file(Self::REPORT_PATH, content);
        fs
    }

    /// A clean agent run: a couple of changes, nothing failed.
    pub fn typical_run() -> Self {
        Self::with_report(Self::TYPICAL_RUN)
    }

    /// A run where resources failed and a service could not be restarted.
    pub fn failed_run() -> Self {
        Self::with_report(Self::FAILED_RUN)
    }

    /// An older agent that only writes a subset of the fields.
    pub fn partial_run() -> Self {
        Self::with_report(Self::PARTIAL_RUN)
    }

    /// A summary cut off in the middle of a write.
    pub fn malformed_run() -> Self {
        Self::with_report(Self::MALFORMED_RUN)
    }
}
