use super::{
    Mode,
    Window,
};
use prometheus::{
    core::Desc,
    IntCounter,
    Opts,
};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Prefix of every exported metric name.
pub const NAMESPACE: &str = "onlyoffice";

/// Name, help text and label names of one exported metric family.
#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    fq_name: String,
    help: String,
    label_names: Vec<&'static str>,
    desc: Desc,
}

impl MetricDescriptor {
    pub fn new(name: &str, help: impl Into<String>, label_names: &[&'static str]) -> prometheus::Result<Self> {
        let fq_name = format!("{NAMESPACE}_{name}");
        let help = help.into();
        let desc = Desc::new(
            fq_name.clone(),
            help.clone(),
            label_names.iter().map(|label| label.to_string()).collect(),
            HashMap::new(),
        )?;

        Ok(Self {
            fq_name,
            help,
            label_names: label_names.to_vec(),
            desc,
        })
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn label_names(&self) -> &[&'static str] {
        &self.label_names
    }

    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    pub fn opts(&self) -> Opts {
        Opts::new(self.fq_name.clone(), self.help.clone())
    }
}

/// All metric families the exporter can emit, created once at startup.
#[derive(Debug, Clone)]
pub struct Descriptors {
    pub up: MetricDescriptor,
    pub license_info: MetricDescriptor,
    pub server_info: MetricDescriptor,
    /// Indexed by `mode.index() * Window::COUNT + window.index()`.
    connections: Vec<MetricDescriptor>,
}

impl Descriptors {
    pub fn new() -> prometheus::Result<Self> {
        let mut connections = Vec::with_capacity(2 * Window::COUNT);
        for mode in Mode::iter() {
            for window in Window::iter() {
                connections.push(MetricDescriptor::new(
                    &format!("{}_connections_last_{}", mode.as_str(), window.as_str()),
                    format!("Number of {} connections during last {}", mode.as_str(), window.as_str()),
                    &["type"],
                )?);
            }
        }

        Ok(Self {
            up: MetricDescriptor::new("up", "Could the OnlyOffice server be reached", &[])?,
            license_info: MetricDescriptor::new(
                "license_info",
                "License Information on OnlyOffice",
                &["connections", "has_license", "build_date", "end_date"],
            )?,
            server_info: MetricDescriptor::new(
                "server_info",
                "Server Information of OnlyOffice",
                &["build_version", "build_number"],
            )?,
            connections,
        })
    }

    pub fn connections(&self, mode: Mode, window: Window) -> &MetricDescriptor {
        &self.connections[mode.index() * Window::COUNT + window.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        [&self.up, &self.license_info, &self.server_info]
            .into_iter()
            .chain(self.connections.iter())
    }
}

/// Process-lifetime counter of failed scrape cycles.
pub fn scrape_failures_counter() -> prometheus::Result<IntCounter> {
    IntCounter::with_opts(
        Opts::new("exporter_scrape_failures_total", "Number of errors while scraping onlyoffice.").namespace(NAMESPACE),
    )
}
