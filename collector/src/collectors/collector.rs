use prometheus::{
    core::Desc,
    proto::MetricFamily,
};
use std::{
    future::Future,
    pin::Pin,
};

/// A source of metric families that is queried once per exposition request.
pub trait Collector: Send + Sync {
    /// Descriptors of every family this collector may return.
    fn describe(&self) -> Vec<&Desc>;

    /// Run one collection cycle and return the resulting families.
    fn collect(&self) -> Pin<Box<dyn Future<Output = Vec<MetricFamily>> + Send + '_>>;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
