#[macro_use]
extern crate tracing;

pub mod error;
pub mod metrics;
pub mod router;

use color_eyre::Result;
use eyre::Context as _;
use onlyoffice_exporter_collector::Collector;
use onlyoffice_exporter_config::{
    ListenAddress,
    ScrapeTarget,
};
use router::create_router;
use std::{
    io,
    net::Ipv6Addr,
    sync::Arc,
};
use tokio::{
    net::TcpListener,
    signal,
};

/// Serves the telemetry path until the process receives SIGINT or SIGTERM.
///
/// Failing to bind the listen address is returned as an error.
pub async fn start_server(target: &ScrapeTarget, collector: Arc<dyn Collector>) -> Result<()> {
    let app = create_router(collector, &target.telemetry_path).wrap_err("Failed to prepare the metric registry")?;

    let listener = bind(&target.listen_address)
        .await
        .wrap_err_with(|| format!("Failed to listen on {}", target.listen_address))?;

    info!(
        address = %listener.local_addr()?,
        path = %target.telemetry_path,
        "Serving metrics"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server terminated unexpectedly")?;

    info!("Shut down");
    Ok(())
}

/// Binds the listen address. A wildcard address prefers the IPv6 wildcard,
/// which is dual-stack on most platforms, and falls back to IPv4 only.
pub async fn bind(address: &ListenAddress) -> io::Result<TcpListener> {
    if address.is_wildcard() {
        match TcpListener::bind((Ipv6Addr::UNSPECIFIED, address.port())).await {
            Ok(listener) => return Ok(listener),
            Err(err) => debug!("Cannot bind the IPv6 wildcard, using IPv4 only: {err}"),
        }
    }
    TcpListener::bind(address.bind_target()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    debug!("Shutdown signal received");
}
