use crate::metrics::{
    exposition_registry,
    handler,
};
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Router,
};
use onlyoffice_exporter_collector::Collector;
use onlyoffice_exporter_config::HEALTH_PATH;
use prometheus::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<dyn Collector>,
    pub registry: Registry,
    pub telemetry_path: Arc<str>,
}

pub fn create_router(collector: Arc<dyn Collector>, telemetry_path: &str) -> prometheus::Result<Router> {
    let registry = exposition_registry(collector.as_ref())?;
    let state = AppState {
        collector,
        registry,
        telemetry_path: telemetry_path.into(),
    };

    Ok(Router::new()
        .route("/", get(landing))
        .route(HEALTH_PATH, get(healthz))
        .route(telemetry_path, get(handler))
        .with_state(state))
}

async fn healthz() -> &'static str {
    "OK"
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>OnlyOffice Exporter</title></head>\n\
         <body>\n\
         <h1>OnlyOffice Exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        path = state.telemetry_path
    ))
}
