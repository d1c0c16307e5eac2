use crate::metrics::MetricDescriptor;
use prometheus::{
    core::Collector as _,
    proto::MetricFamily,
    GaugeVec,
};
use std::collections::HashMap;

/// Samples produced by one scrape cycle.
///
/// Gauge families are created on first use, so a family that never received a
/// sample does not show up in the output at all.
#[derive(Default)]
pub struct MetricBatch {
    /// Each family with the number of samples set on it.
    gauges: Vec<(GaugeVec, usize)>,
    by_name: HashMap<String, usize>,
    families: Vec<MetricFamily>,
}

impl MetricBatch {
    pub fn gauge(&mut self, descriptor: &MetricDescriptor, label_values: &[&str], value: f64) -> prometheus::Result<()> {
        let index = match self.by_name.get(descriptor.fq_name()) {
            Some(index) => *index,
            None => {
                let gauge = GaugeVec::new(descriptor.opts(), descriptor.label_names())?;
                self.gauges.push((gauge, 0));
                self.by_name
                    .insert(descriptor.fq_name().to_string(), self.gauges.len() - 1);
                self.gauges.len() - 1
            }
        };

        let (gauge, samples) = &mut self.gauges[index];
        gauge.get_metric_with_label_values(label_values)?.set(value);
        *samples += 1;
        Ok(())
    }

    /// Appends already collected families, e.g. from a process-wide counter.
    pub fn extend(&mut self, families: Vec<MetricFamily>) {
        self.families.extend(families);
    }

    pub fn finish(self) -> Vec<MetricFamily> {
        self.gauges
            .iter()
            .filter(|(_, samples)| *samples > 0)
            .flat_map(|(gauge, _)| gauge.collect())
            .chain(self.families)
            .collect()
    }
}
