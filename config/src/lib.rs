#[macro_use]
extern crate tracing;

mod args;
mod duration;
mod listen_address;

pub use args::Args;
use color_eyre::Result;
use eyre::{
    bail,
    Context as _,
};
pub use listen_address::ListenAddress;
use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;

/// Liveness route served next to the telemetry path.
pub const HEALTH_PATH: &str = "/healthz";

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Everything the exporter needs to know about where to scrape from and where
/// to serve. Built once at startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    pub listen_address: ListenAddress,
    pub telemetry_path: String,
    pub scrape_uri: String,
    #[serde(default)]
    pub insecure: bool,
    #[serde(with = "duration::humantime_serde")]
    pub scrape_timeout: Duration,
}

impl Default for ScrapeTarget {
    fn default() -> Self {
        Self::builder()
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .expect("Failed to parse default config")
    }
}

impl ScrapeTarget {
    /// Layers the built-in defaults, an optional YAML file and the explicitly
    /// given command-line flags, in that order of precedence.
    pub fn new(args: &Args) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(path) = &args.config {
            debug!(path = %path.display(), "Loading configuration file");
            let source = config::File::from(path.as_path())
                .format(config::FileFormat::Yaml)
                .required(true);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args.clone());

        let target: Self = builder
            .build()
            .wrap_err("Failed to assemble configuration")?
            .try_deserialize()
            .wrap_err("Invalid configuration")?;

        target.validate()?;
        Ok(target)
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
    }

    pub fn validate(&self) -> Result<()> {
        let uri = url::Url::parse(&self.scrape_uri)
            .wrap_err_with(|| format!("Invalid scrape URI '{}'", self.scrape_uri))?;
        if !matches!(uri.scheme(), "http" | "https") {
            bail!("Scrape URI '{}' must use http or https", self.scrape_uri);
        }

        if !self.telemetry_path.starts_with('/') {
            bail!("Telemetry path '{}' must start with '/'", self.telemetry_path);
        }
        if self.telemetry_path == "/" || self.telemetry_path == HEALTH_PATH {
            bail!("Telemetry path '{}' collides with a built-in route", self.telemetry_path);
        }
        // The router treats these as captures or wildcards, or refuses them outright.
        let has_route_syntax = self.telemetry_path.contains(['{', '}'])
            || self
                .telemetry_path
                .split('/')
                .any(|segment| segment.starts_with([':', '*']));
        if has_route_syntax {
            bail!("Telemetry path '{}' must be a literal path", self.telemetry_path);
        }

        if self.scrape_timeout.is_zero() {
            bail!("Scrape timeout must be greater than zero");
        }

        Ok(())
    }
}
