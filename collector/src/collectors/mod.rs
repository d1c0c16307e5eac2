//! # Collectors Module
//!
//! One scrape cycle is split into small pieces:
//!
//! - **`Collector` trait**: interface the metrics endpoint drives on every request
//! - **`UpstreamClient`**: single GET against the statistics URI
//! - **`projector`**: turns a decoded snapshot into gauge samples
//! - **`MetricBatch`**: accumulates the samples of one cycle
//! - **`Exporter`**: serializes cycles and ties the pieces together

pub mod batch;
pub mod client;
pub mod collector;
pub mod exporter;
pub mod projector;

// Re-export the main types for easy access
pub use batch::MetricBatch;
pub use client::{
    UpstreamClient,
    UpstreamResponse,
};
pub use collector::Collector;
pub use exporter::Exporter;
use prometheus::{
    proto::MetricFamily,
    Encoder as _,
    TextEncoder,
};

/// Renders families in the Prometheus text exposition format.
pub fn encode_text(families: &[MetricFamily]) -> prometheus::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
