use crate::{
    collectors::MetricBatch,
    metrics::*,
};
use strum::IntoEnumIterator;

/// Flattens one decoded snapshot into gauge samples.
///
/// Emits one sample per window, mode and statistic, plus the `license_info`
/// and `server_info` gauges whose value is always 1 and whose labels carry the
/// actual information.
pub fn project(stats: &UpstreamStats, descriptors: &Descriptors, batch: &mut MetricBatch) -> prometheus::Result<()> {
    for mode in Mode::iter() {
        for window in Window::iter() {
            let descriptor = descriptors.connections(mode, window);
            let values = stats.connections_stat.window(window).mode(mode);
            for statistic in Statistic::iter() {
                batch.gauge(descriptor, &[statistic.as_str()], values.get(statistic) as f64)?;
            }
        }
    }

    let license = &stats.license_info;
    let connections = license.connections.to_string();
    let has_license = license.has_license.to_string();
    batch.gauge(
        &descriptors.license_info,
        &[
            connections.as_str(),
            has_license.as_str(),
            license.build_date.as_str(),
            license.end_date.as_str(),
        ],
        1.0,
    )?;

    let server = &stats.server_info;
    let build_number = server.build_number.to_string();
    batch.gauge(
        &descriptors.server_info,
        &[server.build_version.as_str(), build_number.as_str()],
        1.0,
    )?;

    Ok(())
}
