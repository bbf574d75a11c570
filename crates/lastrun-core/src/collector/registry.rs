//! Assembles the registry served on the scrape endpoint.

use prometheus::Registry;
use tracing::debug;

use crate::collector::build_info::build_info;
use crate::collector::collector::LastRunCollector;
use crate::collector::traits::FileSystem;
use crate::descriptor::DescriptorSet;
use crate::report::ReportLoader;

/// Creates a registry holding the run summary collector, build info and,
/// on Linux, the exporter's own process metrics.
///
/// Registration validates every descriptor, so a bad namespace or a name
/// collision is reported here rather than on the first scrape.
pub fn build_registry<F>(loader: ReportLoader<F>, namespace: &str) -> prometheus::Result<Registry>
where
    F: FileSystem + 'static,
{
    let registry = Registry::new();

    let descriptors = DescriptorSet::new(namespace)?;
    debug!(count = descriptors.len(), namespace, "built metric descriptors");
    registry.register(Box::new(LastRunCollector::new(loader, descriptors)))?;
    registry.register(Box::new(build_info(namespace)?))?;

    #[cfg(all(feature = "process", target_os = "linux"))]
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    Ok(registry)
}
