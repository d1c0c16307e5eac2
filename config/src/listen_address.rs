use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

const ANY_IPV4_HOST: &str = "0.0.0.0";

/// A `host:port` pair to bind the metrics endpoint on.
///
/// An empty host (`:9876`) means every interface: the server binds the IPv6
/// wildcard, which also accepts IPv4 on dual-stack hosts, and falls back to
/// `0.0.0.0` where IPv6 is unavailable. Bracketed IPv6 hosts (`[::1]:9876`)
/// and hostnames are accepted; resolution happens at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListenAddress {
    host: String,
    port: u16,
}

impl ListenAddress {
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether no host was given, i.e. every interface should be bound.
    pub fn is_wildcard(&self) -> bool {
        self.host.is_empty()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address in a form accepted by `tokio::net::TcpListener::bind`.
    ///
    /// A wildcard address resolves to the IPv4 wildcard here.
    pub fn bind_target(&self) -> String {
        if self.is_wildcard() {
            format!("{}:{}", ANY_IPV4_HOST, self.port)
        } else if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ListenAddress {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| eyre::eyre!("listen address '{}' is missing a port", s))?;
        let port = port
            .parse::<u16>()
            .map_err(|e| eyre::eyre!("invalid port in listen address '{}': {}", s, e))?;

        let host = host.trim_start_matches('[').trim_end_matches(']');

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl TryFrom<String> for ListenAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|e: eyre::Report| e.to_string())
    }
}

impl From<ListenAddress> for String {
    fn from(value: ListenAddress) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, ":{}", self.port)
        } else {
            f.write_str(&self.bind_target())
        }
    }
}
