#[macro_use]
extern crate tracing;

mod logging;

use color_eyre::Result;
pub use logging::{
    init_errors,
    init_logging,
};
use onlyoffice_exporter_collector::Exporter;
pub use onlyoffice_exporter_config::Args;
use onlyoffice_exporter_config::ScrapeTarget;
use onlyoffice_exporter_http::start_server;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<()> {
    let target = ScrapeTarget::new(&args)?;

    info!("Starting onlyoffice-exporter {}", env!("CARGO_PKG_VERSION"));
    info!("Starting Server: {}", target.listen_address);
    info!("Collect from: {}", target.scrape_uri);
    debug!(?target, "Effective configuration");

    let exporter = Arc::new(Exporter::new(&target)?);
    start_server(&target, exporter).await
}
