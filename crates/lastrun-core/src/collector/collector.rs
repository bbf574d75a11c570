//! Scrape-time collector for the run summary.
//!
//! Every scrape reads the summary again, maps it through the
//! [`DescriptorSet`] and emits one constant sample per descriptor. Scrapes on
//! the same collector are serialized so each one sees a single, complete
//! report.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use prometheus::core::Desc;
use prometheus::proto::{self, MetricFamily};
use tracing::{debug, error};

use crate::collector::traits::FileSystem;
use crate::descriptor::{DescriptorSet, MetricDescriptor, ValueKind};
use crate::report::{LoadError, Report, ReportLoader};

/// One emitted value.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub descriptor: &'a MetricDescriptor,
    pub kind: ValueKind,
    pub value: f64,
}

impl Sample<'_> {
    /// Converts the sample into a label-less constant metric family.
    pub fn to_metric_family(&self) -> MetricFamily {
        let mut metric = proto::Metric::default();
        match self.kind {
            ValueKind::Gauge => {
                let mut gauge = proto::Gauge::default();
                gauge.set_value(self.value);
                metric.set_gauge(gauge);
            }
            ValueKind::Counter => {
                let mut counter = proto::Counter::default();
                counter.set_value(self.value);
                metric.set_counter(counter);
            }
        }

        let desc = self.descriptor.desc();
        let mut family = MetricFamily::default();
        family.set_name(desc.fq_name.clone());
        family.set_help(desc.help.clone());
        family.set_field_type(self.kind.metric_type());
        family.mut_metric().push(metric);
        family
    }
}

/// Collector exporting the Puppet run summary.
///
/// Register it with a `prometheus::Registry`; the registry calls
/// [`desc`](prometheus::core::Collector::desc) once at registration and
/// [`collect`](prometheus::core::Collector::collect) on every gather.
pub struct LastRunCollector<F: FileSystem> {
    loader: ReportLoader<F>,
    descriptors: DescriptorSet,
    /// Held for the whole load→map→emit cycle.
    scrape_lock: Mutex<()>,
}

impl<F: FileSystem> LastRunCollector<F> {
    pub fn new(loader: ReportLoader<F>, descriptors: DescriptorSet) -> Self {
        Self {
            loader,
            descriptors,
            scrape_lock: Mutex::new(()),
        }
    }

    pub fn loader(&self) -> &ReportLoader<F> {
        &self.loader
    }

    /// The fixed descriptor set, independent of any report content.
    pub fn describe(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.iter()
    }

    /// Runs one collection cycle and returns a sample per descriptor.
    ///
    /// Errors are returned to the caller untouched; nothing is logged here.
    pub fn collect_samples(&self) -> Result<Vec<Sample<'_>>, LoadError> {
        self.with_report(|report| self.samples(report))
    }

    /// Loads the report and runs `f` on it while holding the scrape lock.
    fn with_report<T>(&self, f: impl FnOnce(&Report) -> T) -> Result<T, LoadError> {
        // A panic in another scrape leaves no state behind worth protecting.
        let _guard = self
            .scrape_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let report = self.loader.load()?;
        Ok(f(&report))
    }

    fn samples<'a>(&'a self, report: &Report) -> Vec<Sample<'a>> {
        self.descriptors
            .iter()
            .map(|descriptor| Sample {
                descriptor,
                kind: descriptor.kind(),
                value: descriptor.field().value(report),
            })
            .collect()
    }
}

impl<F: FileSystem> prometheus::core::Collector for LastRunCollector<F> {
    fn desc(&self) -> Vec<&Desc> {
        self.descriptors.iter().map(MetricDescriptor::desc).collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let start = Instant::now();
        let result = self.with_report(|report| {
            self.samples(report)
                .iter()
                .map(Sample::to_metric_family)
                .collect::<Vec<_>>()
        });
        match result {
            Ok(families) => {
                debug!(
                    samples = families.len(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "collected run summary"
                );
                families
            }
            Err(e) => {
                error!(path = %e.path().display(), error = %e, "failed to collect run summary");
                Vec::new()
            }
        }
    }
}
