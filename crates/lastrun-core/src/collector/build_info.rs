//! Build metadata exported next to the run summary.

use prometheus::{IntGaugeVec, Opts};

use crate::{REVISION, VERSION};

/// Creates `<namespace>_build_info{version, revision} 1`.
pub fn build_info(namespace: &str) -> prometheus::Result<IntGaugeVec> {
    let gauge = IntGaugeVec::new(
        Opts::new(
            "build_info",
            "A metric with a constant '1' value labeled by version and revision of the exporter",
        )
        .namespace(namespace),
        &["version", "revision"],
    )?;
    gauge.with_label_values(&[VERSION, REVISION]).set(1);
    Ok(gauge)
}
