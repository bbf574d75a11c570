//! Decoded Puppet run summary.
//!
//! Puppet writes `last_run_summary.yaml` after every agent run:
//!
//! ```yaml
//! version:
//!   config: 1600000000
//!   puppet: 6.19.1
//! resources:
//!   changed: 0
//!   failed: 0
//!   total: 210
//! time:
//!   catalog_application: 2.18
//!   config_retrieval: 1.02
//!   total: 6.41
//!   last_run: 1600000000
//! changes:
//!   total: 0
//! events:
//!   failure: 0
//!   success: 0
//!   total: 0
//! ```
//!
//! Decoding is lenient: unknown keys are ignored and absent or empty keys
//! (or whole sections) read as zero, so summaries written by older or newer agents still
//! produce a full metric set.

pub mod loader;

pub use loader::{LoadError, ReportLoader};

use serde::{Deserialize, Deserializer};

/// One decoded run summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub version: VersionInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub resources: Resources,
    #[serde(deserialize_with = "null_as_default")]
    pub time: Timings,
    #[serde(deserialize_with = "null_as_default")]
    pub changes: Changes,
    #[serde(deserialize_with = "null_as_default")]
    pub events: Events,
}

/// `version` section. Not exported as metrics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Catalog version; usually an epoch, sometimes a commit id.
    #[serde(deserialize_with = "scalar_string")]
    pub config: String,
    /// Agent version.
    #[serde(deserialize_with = "scalar_string")]
    pub puppet: String,
}

/// `resources` section: resource counts by state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Resources {
    #[serde(deserialize_with = "null_as_default")]
    pub changed: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub corrective_change: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed_to_restart: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub out_of_sync: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub restarted: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub scheduled: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub skipped: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

/// `time` section: phase and per-resource-type durations in seconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timings {
    #[serde(deserialize_with = "null_as_default")]
    pub anchor: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub archive: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub catalog_application: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub config_retrieval: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub convert_catalog: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub exec: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub fact_generation: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub file: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub filebucket: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub group: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub node_retrieval: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub package: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub plugin_sync: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub schedule: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub service: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_evaluation: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub user: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub yumrepo: f64,
    /// Epoch seconds of the run.
    #[serde(alias = "timeLastRunEpoch", deserialize_with = "null_as_default")]
    pub last_run: f64,
}

/// `changes` section. Not exported as metrics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Changes {
    #[serde(deserialize_with = "null_as_default")]
    pub changes: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

/// `events` section. Not exported as metrics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Events {
    #[serde(deserialize_with = "null_as_default")]
    pub failure: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub success: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

/// Decodes a run summary document.
///
/// A blank document decodes to an all-zero report, matching what an agent
/// leaves behind when it truncates the file before rewriting it.
pub fn parse_report(content: &str) -> Result<Report, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Report::default());
    }
    serde_yaml::from_str(content)
}

/// A key or section written with no value (`failed:`, `resources:`) decodes
/// as YAML null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any YAML scalar and keeps its textual form.
///
/// Unquoted numbers go through the YAML number type first, so `7.10` comes
/// back as `7.1`. Quote the value to keep it verbatim.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Unexpected};
    use serde_yaml::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Sequence(_) => Err(D::Error::invalid_type(Unexpected::Seq, &"a scalar")),
        Value::Mapping(_) => Err(D::Error::invalid_type(Unexpected::Map, &"a scalar")),
        Value::Tagged(_) => Err(D::Error::invalid_type(
            Unexpected::Other("tagged value"),
            &"a scalar",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SUMMARY: &str = "\
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
  exec: 0.42
  fact_generation: 0.987143
  file: 0.532
  filebucket: 0.000113
  node_retrieval: 0.201554
  package: 0.13
  plugin_sync: 0.811732
  service: 0.25
  transaction_evaluation: 1.827004
  total: 6.412337
  last_run: 1600000000
changes:
  total: 2
events:
  failure: 0
  success: 2
  total: 2
";

    #[test]
    fn test_parse_full_summary() {
        let report = parse_report(FULL_SUMMARY).unwrap();
        assert_eq!(report.version.config, "1600000000");
        assert_eq!(report.version.puppet, "6.19.1");
        assert_eq!(report.resources.changed, 2.0);
        assert_eq!(report.resources.corrective_change, 1.0);
        assert_eq!(report.resources.out_of_sync, 2.0);
        assert_eq!(report.resources.total, 210.0);
        assert_eq!(report.time.catalog_application, 2.183921);
        assert_eq!(report.time.filebucket, 0.000113);
        assert_eq!(report.time.exec, 0.42);
        assert_eq!(report.time.last_run, 1_600_000_000.0);
        assert_eq!(report.changes.total, 2.0);
        assert_eq!(report.events.success, 2.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let report = parse_report("resources:\n  total: 42\n").unwrap();
        assert_eq!(report.resources.total, 42.0);
        assert_eq!(report.resources.failed, 0.0);
        assert_eq!(report.time, Timings::default());
        assert_eq!(report.version.puppet, "");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let content = "\
resources:
  total: 5
  brand_new_counter: 9
time:
  some_custom_type: 1.5
cached_catalog_status: not_used
";
        let report = parse_report(content).unwrap();
        assert_eq!(report.resources.total, 5.0);
        assert_eq!(report.time.total, 0.0);
    }

    #[test]
    fn test_last_run_epoch_alias() {
        let report = parse_report("time:\n  timeLastRunEpoch: 1600000000\n").unwrap();
        assert_eq!(report.time.last_run, 1_600_000_000.0);
    }

    #[test]
    fn test_empty_section_is_zero() {
        let report = parse_report("resources:\ntime:\n  total: 3.5\n").unwrap();
        assert_eq!(report.resources, Resources::default());
        assert_eq!(report.time.total, 3.5);
    }

    #[test]
    fn test_empty_value_is_zero() {
        let report = parse_report("resources:\n  failed:\n  total: 5\n").unwrap();
        assert_eq!(report.resources.failed, 0.0);
        assert_eq!(report.resources.total, 5.0);

        let report = parse_report("time:\n  total: ~\n  last_run: null\n  exec: 0.5\n").unwrap();
        assert_eq!(report.time.total, 0.0);
        assert_eq!(report.time.last_run, 0.0);
        assert_eq!(report.time.exec, 0.5);
    }

    #[test]
    fn test_blank_document_is_zero() {
        assert_eq!(parse_report("").unwrap(), Report::default());
        assert_eq!(parse_report("  \n\n").unwrap(), Report::default());
    }

    #[test]
    fn test_quoted_version_strings() {
        let report = parse_report("version:\n  config: \"production-5f3a2c1\"\n  puppet: \"7.24.0\"\n")
            .unwrap();
        assert_eq!(report.version.config, "production-5f3a2c1");
        assert_eq!(report.version.puppet, "7.24.0");
    }

    #[test]
    fn test_unquoted_version_goes_through_number() {
        let report = parse_report("version:\n  config: 1600000000\n  puppet: 7.10\n").unwrap();
        assert_eq!(report.version.config, "1600000000");
        assert_eq!(report.version.puppet, "7.1");

        let report = parse_report("version:\n  puppet: \"7.10\"\n").unwrap();
        assert_eq!(report.version.puppet, "7.10");
    }

    #[test]
    fn test_malformed_documents_fail() {
        assert!(parse_report("- just\n- a list\n").is_err());
        assert!(parse_report("resources:\n  total: lots\n").is_err());
        assert!(parse_report("resources: [unterminated\n").is_err());
        assert!(parse_report("version:\n  puppet: [7, 24]\n").is_err());
    }
}
