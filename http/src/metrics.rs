use crate::{
    error::AppError,
    router::AppState,
};
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{
        IntoResponse,
        Response,
    },
};
use onlyoffice_exporter_collector::Collector;
use prometheus::{
    core::Desc,
    Encoder as _,
    Registry,
    TextEncoder,
    TEXT_FORMAT,
};
use std::collections::HashSet;

/// Registry for the process-wide metrics exposed next to the collector's
/// families (`process_*` on Linux).
///
/// Fails when a family name would be exposed twice.
pub fn exposition_registry(collector: &dyn Collector) -> prometheus::Result<Registry> {
    let registry = Registry::new();
    let mut names = HashSet::new();
    ensure_unique(&mut names, collector.describe())?;

    #[cfg(target_os = "linux")]
    {
        use prometheus::core::Collector as _;

        let process = prometheus::process_collector::ProcessCollector::for_self();
        ensure_unique(&mut names, process.desc())?;
        registry.register(Box::new(process))?;
    }

    debug!(collector = collector.name(), families = names.len(), "Prepared metric registry");
    Ok(registry)
}

fn ensure_unique(names: &mut HashSet<String>, descs: Vec<&Desc>) -> prometheus::Result<()> {
    for desc in descs {
        if !names.insert(desc.fq_name.clone()) {
            return Err(prometheus::Error::Msg(format!("duplicate metric family '{}'", desc.fq_name)));
        }
    }
    Ok(())
}

/// Runs one collection cycle and renders it in the text exposition format.
pub async fn handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut families = state.collector.collect().await;
    trace!(collector = state.collector.name(), families = families.len(), "Collected metrics");
    families.extend(state.registry.gather());

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;

    Ok(([(CONTENT_TYPE, TEXT_FORMAT)], buffer).into_response())
}
