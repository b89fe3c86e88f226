//! Command-line configuration, layered over an optional config file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};

use fleetwatch_core::{ExemptionConfig, ExemptionMode, FleetwatchConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Exempt `X.service` when `X.timer` is deployed.
    Companion,
    /// Exempt units matching `--timer-based-services`.
    Patterns,
}

impl From<ModeArg> for ExemptionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Companion => ExemptionMode::Companion,
            ModeArg::Patterns => ExemptionMode::Patterns,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML config file. Flags override values from the file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fleet API http endpoint, e.g. `http://host:port`.
    #[arg(long, visible_alias = "fleetEndpoint", global = true)]
    pub fleet_endpoint: Option<String>,

    /// Use the specified SOCKS proxy, e.g. `localhost:2323`.
    #[arg(long, global = true)]
    pub socks_proxy: Option<String>,

    /// Comma-separated patterns of timer-based services, e.g.
    /// `deployer\.service,mongo-backup@\d+\.service`. Selects pattern mode
    /// unless `--exemption-mode` says otherwise. An empty list is ignored.
    #[arg(long, visible_alias = "timerBasedServices", global = true)]
    pub timer_based_services: Option<String>,

    /// How inactive units are exempted.
    #[arg(long, value_enum, global = true)]
    pub exemption_mode: Option<ModeArg>,

    /// Port to listen on.
    #[arg(long, global = true)]
    pub port: Option<u16>,
}

impl ConfigArgs {
    /// Load the file (if any), apply flags, and validate the result.
    pub fn resolve(&self) -> anyhow::Result<FleetwatchConfig> {
        let mut config = match &self.config {
            Some(path) => FleetwatchConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => FleetwatchConfig::default(),
        };

        if let Some(endpoint) = &self.fleet_endpoint {
            config.fleet_endpoint = endpoint.clone();
        }
        if let Some(proxy) = self.socks_proxy.as_deref().filter(|p| !p.is_empty()) {
            config.socks_proxy = Some(proxy.to_string());
        }
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        // An empty list (the legacy flag's default) counts as not given.
        let patterns = self
            .timer_based_services
            .as_deref()
            .map(ExemptionConfig::parse_pattern_list)
            .filter(|patterns| !patterns.is_empty());
        if let Some(patterns) = patterns {
            config.exemption.patterns = patterns;
            config.exemption.mode = ExemptionMode::Patterns;
        }
        if let Some(mode) = self.exemption_mode {
            config.exemption.mode = mode.into();
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        TestCli::parse_from(std::iter::once("fleetwatchd").chain(args.iter().copied())).config
    }

    #[test]
    fn flags_build_config() {
        let config = parse(&["--fleet-endpoint", "http://fleet:49153", "--port", "9000"])
            .resolve()
            .unwrap();
        assert_eq!(config.fleet_endpoint, "http://fleet:49153");
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.exemption.mode, ExemptionMode::Companion);
        assert_eq!(config.socks_proxy, None);
    }

    #[test]
    fn legacy_flag_names_are_accepted() {
        let config = parse(&[
            "--fleetEndpoint",
            "http://fleet:49153",
            "--timerBasedServices",
            r"deployer\.service,image-cleaner\.service",
        ])
        .resolve()
        .unwrap();
        assert_eq!(config.exemption.mode, ExemptionMode::Patterns);
        assert_eq!(config.exemption.patterns.len(), 2);
    }

    #[test]
    fn empty_socks_proxy_means_none() {
        let config = parse(&["--fleet-endpoint", "http://fleet:49153", "--socks-proxy", ""])
            .resolve()
            .unwrap();
        assert_eq!(config.socks_proxy, None);
    }

    #[test]
    fn missing_endpoint_fails() {
        assert!(parse(&[]).resolve().is_err());
    }

    #[test]
    fn patterns_with_companion_mode_fail() {
        let result = parse(&[
            "--fleet-endpoint",
            "http://fleet:49153",
            "--timer-based-services",
            r"deployer\.service",
            "--exemption-mode",
            "companion",
        ])
        .resolve();
        assert!(result.is_err());
    }

    #[test]
    fn empty_timer_based_services_keeps_companion_mode() {
        for list in ["", " , "] {
            let config = parse(&["--fleet-endpoint", "http://fleet:49153", "--timerBasedServices", list])
                .resolve()
                .unwrap();
            assert_eq!(config.exemption.mode, ExemptionMode::Companion, "list {list:?}");
            assert!(config.exemption.patterns.is_empty());
        }
    }

    #[test]
    fn empty_timer_based_services_keeps_file_patterns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "fleet_endpoint = \"http://fleet:1\"\n[exemption]\nmode = \"patterns\"\npatterns = ['deployer\\.service']"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", &path, "--timer-based-services", ""])
            .resolve()
            .unwrap();
        assert_eq!(config.exemption.mode, ExemptionMode::Patterns);
        assert_eq!(config.exemption.patterns, vec![r"deployer\.service".to_string()]);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fleet_endpoint = \"http://from-file:1\"\nlisten_port = 7000").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", &path, "--fleet-endpoint", "http://from-flag:2"])
            .resolve()
            .unwrap();
        assert_eq!(config.fleet_endpoint, "http://from-flag:2");
        assert_eq!(config.listen_port, 7000);
    }
}
