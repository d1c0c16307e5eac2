use clap::Parser;
use std::path::PathBuf;

/// Prometheus exporter for OnlyOffice document server statistics
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address on which to expose metrics [default: :9876]
    #[arg(long, alias = "web.listen-address", env = "ONLYOFFICE_EXPORTER_LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics [default: /metrics]
    #[arg(long, alias = "web.telemetry-path", env = "ONLYOFFICE_EXPORTER_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    /// URI to the onlyoffice statistics info [default: http://localhost/info/info.json]
    #[arg(long, alias = "scrape_uri", env = "ONLYOFFICE_EXPORTER_SCRAPE_URI")]
    pub scrape_uri: Option<String>,

    /// Ignore onlyoffice server certificate if using https.
    #[arg(long, action, env = "ONLYOFFICE_EXPORTER_INSECURE")]
    pub insecure: bool,

    /// Upper bound for a single scrape request, e.g. "10s" or "500ms" [default: 10s]
    #[arg(long, env = "ONLYOFFICE_EXPORTER_SCRAPE_TIMEOUT")]
    pub scrape_timeout: Option<String>,

    /// Optional YAML file with exporter settings. Flags take precedence.
    #[arg(long, env = "ONLYOFFICE_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl config::Source for Args {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = config::Map::new();
        if let Some(listen_address) = &self.listen_address {
            cache.insert("listen_address".to_string(), listen_address.as_str().into());
        }
        if let Some(telemetry_path) = &self.telemetry_path {
            cache.insert("telemetry_path".to_string(), telemetry_path.as_str().into());
        }
        if let Some(scrape_uri) = &self.scrape_uri {
            cache.insert("scrape_uri".to_string(), scrape_uri.as_str().into());
        }
        // An unset flag must not override `insecure: true` from a config file.
        if self.insecure {
            cache.insert("insecure".to_string(), true.into());
        }
        if let Some(scrape_timeout) = &self.scrape_timeout {
            cache.insert("scrape_timeout".to_string(), scrape_timeout.as_str().into());
        }
        Ok(cache)
    }
}
