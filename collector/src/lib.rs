//! # OnlyOffice Exporter Collector
//!
//! Scrapes the statistics endpoint of an OnlyOffice document server and turns
//! the answer into Prometheus metrics.
//!
//! ## Architecture
//!
//! - **`metrics`**: the decoded upstream schema and the metric descriptors
//! - **`collectors`**: the HTTP client, the projection into samples and the
//!   `Exporter` that runs one scrape cycle per exposition request
//! - **`error`**: why a scrape cycle was aborted
//!
//! ## Exported metrics
//!
//! | Name | Labels |
//! |------|--------|
//! | `onlyoffice_up` | |
//! | `onlyoffice_{edit,view}_connections_last_{hour,day,week,month}` | `type` (`min`, `avr`, `max`) |
//! | `onlyoffice_license_info` | `connections`, `has_license`, `build_date`, `end_date` |
//! | `onlyoffice_server_info` | `build_version`, `build_number` |
//! | `onlyoffice_exporter_scrape_failures_total` | |

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod error;
pub mod metrics;

pub use collectors::*;
pub use error::ScrapeError;
pub use metrics::*;
