//! fleetwatch.toml configuration parser.
//!
//! Every field has a default except the fleet endpoint. The daemon loads
//! an optional file, overlays command-line flags, then calls
//! [`FleetwatchConfig::validate`] before anything touches the network.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetwatchConfig {
    /// Fleet API base URL, e.g. `http://10.0.0.1:49153`.
    pub fleet_endpoint: String,
    /// SOCKS5 proxy (`host:port`) used to reach the fleet API.
    pub socks_proxy: Option<String>,
    /// Port the report is served on.
    pub listen_port: u16,
    /// Fleet API timeouts.
    pub timeouts: TimeoutConfig,
    /// How inactive units are exempted.
    pub exemption: ExemptionConfig,
    /// Report title and description.
    pub report: ReportConfig,
}

/// Fleet API timeouts, in seconds. All must be nonzero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connect timeout.
    pub connect_secs: u64,
    /// Proxy and TLS handshake budget, added to the connect timeout.
    pub handshake_secs: u64,
    /// Bound on each page request and on the whole paginated read.
    pub request_secs: u64,
}

/// Which rule decides that an inactive unit is expected to be idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionMode {
    /// `X.service` is exempt when `X.timer` is present in the snapshot.
    #[default]
    Companion,
    /// Unit name fully matches one of the configured patterns.
    Patterns,
}

/// Exemption settings. Patterns are only allowed, and required, in
/// [`ExemptionMode::Patterns`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemptionConfig {
    pub mode: ExemptionMode,
    /// Regular expressions matched against the whole unit name.
    pub patterns: Vec<String>,
}

/// Fixed text at the top of every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report `name`.
    pub title: String,
    /// Report `description`.
    pub description: String,
}

impl Default for FleetwatchConfig {
    fn default() -> Self {
        Self {
            fleet_endpoint: String::new(),
            socks_proxy: None,
            listen_port: 8080,
            timeouts: TimeoutConfig::default(),
            exemption: ExemptionConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 30,
            handshake_secs: 10,
            request_secs: 60,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Coco Fleet Unit Healthcheck".to_string(),
            description: "Checks the health of all fleet units".to_string(),
        }
    }
}

impl TimeoutConfig {
    /// Budget for establishing a connection, including proxy and TLS handshakes.
    pub fn connect_budget(&self) -> Duration {
        Duration::from_secs(self.connect_secs + self.handshake_secs)
    }

    /// Bound on one page request and on the whole read.
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl ExemptionConfig {
    /// Split a comma-separated pattern list, dropping blank entries.
    pub fn parse_pattern_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl FleetwatchConfig {
    /// Load and parse a TOML file. Does not validate.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check everything that can be checked without network access.
    ///
    /// Exemption patterns are compiled (and their syntax reported) by the
    /// health engine when it builds its policy.
    pub fn validate(&self) -> ConfigResult<()> {
        self.endpoint_url()?;

        if let Some(proxy) = &self.socks_proxy {
            validate_proxy_address(proxy)?;
        }

        match self.exemption.mode {
            ExemptionMode::Companion if !self.exemption.patterns.is_empty() => {
                return Err(ConfigError::PatternsInCompanionMode);
            }
            ExemptionMode::Patterns if self.exemption.patterns.is_empty() => {
                return Err(ConfigError::NoPatterns);
            }
            _ => {}
        }

        if self.timeouts.connect_secs == 0 {
            return Err(ConfigError::ZeroTimeout("connect"));
        }
        if self.timeouts.handshake_secs == 0 {
            return Err(ConfigError::ZeroTimeout("handshake"));
        }
        if self.timeouts.request_secs == 0 {
            return Err(ConfigError::ZeroTimeout("request"));
        }

        Ok(())
    }

    /// Parsed fleet endpoint. Only `http` and `https` are accepted.
    pub fn endpoint_url(&self) -> ConfigResult<url::Url> {
        let endpoint = self.fleet_endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let url = url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }
}

fn validate_proxy_address(address: &str) -> ConfigResult<()> {
    let invalid = || ConfigError::InvalidProxy {
        address: address.to_string(),
    };
    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || host.contains('/') {
        return Err(invalid());
    }
    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(()),
        _ => Err(invalid()),
    }
}
