//! Typed view of the document server's `info.json` statistics.
//!
//! Every field is optional on the wire: missing keys and explicit `null`s fall
//! back to zero, `false` or an empty string. Only malformed JSON or a value of
//! the wrong type (e.g. a string where a count is expected) fails to decode.

use super::{
    Mode,
    Statistic,
    Window,
};
use serde::{
    Deserialize,
    Deserializer,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstreamStats {
    #[serde(deserialize_with = "nullable")]
    pub connections_stat: ConnectionsStat,
    #[serde(deserialize_with = "nullable")]
    pub license_info: LicenseInfo,
    #[serde(deserialize_with = "nullable")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionsStat {
    #[serde(deserialize_with = "nullable")]
    pub hour: WindowStats,
    #[serde(deserialize_with = "nullable")]
    pub day: WindowStats,
    #[serde(deserialize_with = "nullable")]
    pub week: WindowStats,
    #[serde(deserialize_with = "nullable")]
    pub month: WindowStats,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowStats {
    #[serde(deserialize_with = "nullable")]
    pub edit: ModeStats,
    #[serde(deserialize_with = "nullable")]
    pub view: ModeStats,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModeStats {
    #[serde(deserialize_with = "nullable")]
    pub min: u64,
    #[serde(deserialize_with = "nullable")]
    pub avr: u64,
    #[serde(deserialize_with = "nullable")]
    pub max: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LicenseInfo {
    #[serde(deserialize_with = "nullable")]
    pub connections: u64,
    #[serde(deserialize_with = "nullable")]
    pub has_license: bool,
    #[serde(deserialize_with = "nullable")]
    pub build_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(deserialize_with = "nullable")]
    pub build_version: String,
    #[serde(deserialize_with = "nullable")]
    pub build_number: u64,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl UpstreamStats {
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}

impl ConnectionsStat {
    pub fn window(&self, window: Window) -> &WindowStats {
        match window {
            Window::Hour => &self.hour,
            Window::Day => &self.day,
            Window::Week => &self.week,
            Window::Month => &self.month,
        }
    }
}

impl WindowStats {
    pub fn mode(&self, mode: Mode) -> &ModeStats {
        match mode {
            Mode::Edit => &self.edit,
            Mode::View => &self.view,
        }
    }
}

impl ModeStats {
    pub fn get(&self, statistic: Statistic) -> u64 {
        match statistic {
            Statistic::Min => self.min,
            Statistic::Avr => self.avr,
            Statistic::Max => self.max,
        }
    }
}
