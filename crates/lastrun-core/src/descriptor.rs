//! Fixed mapping from report fields to exported metrics.
//!
//! A [`DescriptorSet`] is built once at startup and handed to the collector.
//! It never changes afterwards, so the `Desc` identities the registry checks
//! for collisions stay the same for the whole process lifetime.

use prometheus::Opts;
use prometheus::core::{Desc, Describer};
use prometheus::proto::MetricType;

use crate::report::Report;

/// How a sample is typed in the exposition output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Gauge,
    /// Only used for the last-run epoch, which never decreases between runs.
    Counter,
}

impl ValueKind {
    pub fn metric_type(self) -> MetricType {
        match self {
            ValueKind::Gauge => MetricType::GAUGE,
            ValueKind::Counter => MetricType::COUNTER,
        }
    }
}

/// Report fields that are exported.
///
/// Fields of [`Report`] without a variant here are decoded but not exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    ResourcesChanged,
    ResourcesCorrectiveChange,
    ResourcesFailed,
    ResourcesFailedToRestart,
    ResourcesOutOfSync,
    ResourcesRestarted,
    ResourcesScheduled,
    ResourcesSkipped,
    ResourcesTotal,
    TimeCatalogApplication,
    TimeConfigRetrieval,
    TimeConvertCatalog,
    TimeFactGeneration,
    TimeFilebucket,
    TimeNodeRetrieval,
    TimePluginSync,
    TimeTransactionEvaluation,
    TimeTotal,
    TimeLastRun,
}

impl ReportField {
    /// Reads this field from `report`.
    pub fn value(self, report: &Report) -> f64 {
        let r = &report.resources;
        let t = &report.time;
        match self {
            ReportField::ResourcesChanged => r.changed,
            ReportField::ResourcesCorrectiveChange => r.corrective_change,
            ReportField::ResourcesFailed => r.failed,
            ReportField::ResourcesFailedToRestart => r.failed_to_restart,
            ReportField::ResourcesOutOfSync => r.out_of_sync,
            ReportField::ResourcesRestarted => r.restarted,
            ReportField::ResourcesScheduled => r.scheduled,
            ReportField::ResourcesSkipped => r.skipped,
            ReportField::ResourcesTotal => r.total,
            ReportField::TimeCatalogApplication => t.catalog_application,
            ReportField::TimeConfigRetrieval => t.config_retrieval,
            ReportField::TimeConvertCatalog => t.convert_catalog,
            ReportField::TimeFactGeneration => t.fact_generation,
            ReportField::TimeFilebucket => t.filebucket,
            ReportField::TimeNodeRetrieval => t.node_retrieval,
            ReportField::TimePluginSync => t.plugin_sync,
            ReportField::TimeTransactionEvaluation => t.transaction_evaluation,
            ReportField::TimeTotal => t.total,
            ReportField::TimeLastRun => t.last_run,
        }
    }

    /// Dotted YAML key of the field, e.g. `resources.total`.
    pub fn key(self) -> &'static str {
        match self {
            ReportField::ResourcesChanged => "resources.changed",
            ReportField::ResourcesCorrectiveChange => "resources.corrective_change",
            ReportField::ResourcesFailed => "resources.failed",
            ReportField::ResourcesFailedToRestart => "resources.failed_to_restart",
            ReportField::ResourcesOutOfSync => "resources.out_of_sync",
            ReportField::ResourcesRestarted => "resources.restarted",
            ReportField::ResourcesScheduled => "resources.scheduled",
            ReportField::ResourcesSkipped => "resources.skipped",
            ReportField::ResourcesTotal => "resources.total",
            ReportField::TimeCatalogApplication => "time.catalog_application",
            ReportField::TimeConfigRetrieval => "time.config_retrieval",
            ReportField::TimeConvertCatalog => "time.convert_catalog",
            ReportField::TimeFactGeneration => "time.fact_generation",
            ReportField::TimeFilebucket => "time.filebucket",
            ReportField::TimeNodeRetrieval => "time.node_retrieval",
            ReportField::TimePluginSync => "time.plugin_sync",
            ReportField::TimeTransactionEvaluation => "time.transaction_evaluation",
            ReportField::TimeTotal => "time.total",
            ReportField::TimeLastRun => "time.last_run",
        }
    }
}

/// (subsystem, name, help, field, kind)
#[rustfmt::skip]
const DEFAULT_MAPPING: [(&str, &str, &str, ReportField, ValueKind); 19] = [
    ("resources", "ResourcesChanged", "Number of changed resources", ReportField::ResourcesChanged, ValueKind::Gauge),
    ("resources", "ResourcesCorrectiveChange", "Number of corrective changes", ReportField::ResourcesCorrectiveChange, ValueKind::Gauge),
    ("resources", "ResourcesFailed", "Number of failed resources", ReportField::ResourcesFailed, ValueKind::Gauge),
    ("resources", "ResourcesFailedRestart", "Number of resources failed to restart", ReportField::ResourcesFailedToRestart, ValueKind::Gauge),
    ("resources", "ResourcesOutOfSync", "Number of resources out of sync", ReportField::ResourcesOutOfSync, ValueKind::Gauge),
    ("resources", "ResourcesRestarted", "Number of restarted resources", ReportField::ResourcesRestarted, ValueKind::Gauge),
    ("resources", "ResourcesScheduled", "Number of scheduled resources", ReportField::ResourcesScheduled, ValueKind::Gauge),
    ("resources", "ResourcesSkipped", "Number of skipped resources", ReportField::ResourcesSkipped, ValueKind::Gauge),
    ("resources", "ResourcesTotal", "Total number of resources", ReportField::ResourcesTotal, ValueKind::Gauge),
    ("", "TimeCatalogApplication", "Catalog application time", ReportField::TimeCatalogApplication, ValueKind::Gauge),
    ("", "TimeConfigRetrieval", "Config retrieval time", ReportField::TimeConfigRetrieval, ValueKind::Gauge),
    ("", "TimeConvertCatalog", "Catalog conversion time", ReportField::TimeConvertCatalog, ValueKind::Gauge),
    ("", "TimeFactGeneration", "Fact generation time", ReportField::TimeFactGeneration, ValueKind::Gauge),
    ("", "TimeFileBucket", "Filebucket time", ReportField::TimeFilebucket, ValueKind::Gauge),
    ("", "TimeNodeRetrieval", "Node retrieval time", ReportField::TimeNodeRetrieval, ValueKind::Gauge),
    ("", "TimePluginSync", "Plugin sync time", ReportField::TimePluginSync, ValueKind::Gauge),
    ("", "TimeTransactionEvaluation", "Transaction evaluation time", ReportField::TimeTransactionEvaluation, ValueKind::Gauge),
    ("", "TimeTotal", "Total time", ReportField::TimeTotal, ValueKind::Gauge),
    ("", "TimeLastRun", "Last puppet run", ReportField::TimeLastRun, ValueKind::Counter),
];

/// One exported metric: its `Desc`, value kind and source field.
#[derive(Debug)]
pub struct MetricDescriptor {
    desc: Desc,
    kind: ValueKind,
    field: ReportField,
}

impl MetricDescriptor {
    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    /// Fully-qualified metric name.
    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn field(&self) -> ReportField {
        self.field
    }
}

/// The immutable set of exported metric descriptors.
#[derive(Debug)]
pub struct DescriptorSet {
    descriptors: Vec<MetricDescriptor>,
}

impl DescriptorSet {
    /// Builds the default mapping under `namespace`.
    ///
    /// Fails only if `namespace` does not produce valid metric names.
    pub fn new(namespace: &str) -> prometheus::Result<Self> {
        let descriptors = DEFAULT_MAPPING
            .iter()
            .map(|&(subsystem, name, help, field, kind)| {
                let desc = Opts::new(name, help)
                    .namespace(namespace)
                    .subsystem(subsystem)
                    .describe()?;
                Ok(MetricDescriptor { desc, kind, field })
            })
            .collect::<prometheus::Result<Vec<_>>>()?;
        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks up a descriptor by its fully-qualified name.
    pub fn by_name(&self, name: &str) -> Option<&MetricDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_NAMESPACE;
    use std::collections::HashSet;

    #[test]
    fn test_default_set_has_19_unique_descriptors() {
        let set = DescriptorSet::new(DEFAULT_NAMESPACE).unwrap();
        assert_eq!(set.len(), 19);

        let ids: HashSet<u64> = set.iter().map(|d| d.desc().id).collect();
        assert_eq!(ids.len(), 19);
        let fields: HashSet<ReportField> = set.iter().map(|d| d.field()).collect();
        assert_eq!(fields.len(), 19);
    }

    #[test]
    fn test_fully_qualified_names() {
        let set = DescriptorSet::new(DEFAULT_NAMESPACE).unwrap();
        let total = set
            .by_name("puppet_last_run_exporter_resources_ResourcesTotal")
            .unwrap();
        assert_eq!(total.field(), ReportField::ResourcesTotal);
        assert_eq!(total.help(), "Total number of resources");

        let last_run = set.by_name("puppet_last_run_exporter_TimeLastRun").unwrap();
        assert_eq!(last_run.kind(), ValueKind::Counter);
        assert_eq!(last_run.field().key(), "time.last_run");
    }

    #[test]
    fn test_only_last_run_is_counter() {
        let set = DescriptorSet::new(DEFAULT_NAMESPACE).unwrap();
        let counters: Vec<_> = set
            .iter()
            .filter(|d| d.kind() == ValueKind::Counter)
            .map(|d| d.field())
            .collect();
        assert_eq!(counters, vec![ReportField::TimeLastRun]);
    }

    #[test]
    fn test_descriptors_have_no_labels() {
        let set = DescriptorSet::new(DEFAULT_NAMESPACE).unwrap();
        for d in set.iter() {
            assert!(d.desc().variable_labels.is_empty(), "{}", d.name());
            assert!(d.desc().const_label_pairs.is_empty(), "{}", d.name());
        }
    }

    #[test]
    fn test_custom_namespace() {
        let set = DescriptorSet::new("site_puppet").unwrap();
        assert!(set.by_name("site_puppet_TimeTotal").is_some());
        assert!(set.by_name("puppet_last_run_exporter_TimeTotal").is_none());
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        assert!(DescriptorSet::new("bad-namespace").is_err());
    }

    #[test]
    fn test_field_values_read_from_report() {
        let mut report = Report::default();
        report.resources.failed_to_restart = 4.0;
        report.time.filebucket = 0.25;
        assert_eq!(ReportField::ResourcesFailedToRestart.value(&report), 4.0);
        assert_eq!(ReportField::TimeFilebucket.value(&report), 0.25);
        assert_eq!(ReportField::ResourcesTotal.value(&report), 0.0);
    }
}
