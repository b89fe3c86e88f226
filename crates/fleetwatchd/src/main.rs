//! fleetwatchd — the Fleetwatch daemon.
//!
//! Polls the fleet API for every unit's state on each request and serves
//! one aggregated health report:
//! - Configuration (file + flags, validated before startup)
//! - Fleet API client (optional SOCKS proxy)
//! - Health engine (classification, exemptions, parallel aggregation)
//! - HTTP surface on `/` and `/__health`
//!
//! # Usage
//!
//! ```text
//! fleetwatchd serve --fleet-endpoint http://fleet:49153 --socks-proxy localhost:2323
//! fleetwatchd check --fleet-endpoint http://fleet:49153
//! ```

mod settings;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use fleetwatch_core::{ExemptionMode, FleetwatchConfig};
use fleetwatch_health::{ExemptionPolicy, HealthService};
use fleetwatch_source::FleetApiClient;

use crate::settings::ConfigArgs;

#[derive(Parser)]
#[command(name = "fleetwatchd", about = "Fleet unit health aggregator")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the health report over HTTP (the default).
    Serve,
    /// Build one report, print it as JSON, and exit.
    ///
    /// Exit code is 0 when healthy, 1 when any unit is unhealthy, and 2
    /// when unit states could not be read.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,fleetwatch=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.resolve()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_serve(config).await.map(|()| ExitCode::SUCCESS),
        Command::Check => run_check(config).await,
    }
}

/// Wire the fleet client and exemption policy into a health service.
fn build_service(config: &FleetwatchConfig) -> anyhow::Result<HealthService> {
    let policy = ExemptionPolicy::from_config(&config.exemption)
        .context("invalid exemption pattern")?;
    match config.exemption.mode {
        ExemptionMode::Companion => info!("exempting services with a companion timer"),
        ExemptionMode::Patterns => {
            info!(patterns = ?config.exemption.patterns, "exempting timer-based services")
        }
    }

    let client = FleetApiClient::new(config).context("building fleet api client")?;
    info!(url = %client.state_url(), "fleet api client ready");

    Ok(HealthService::new(
        Arc::new(client),
        policy,
        config.report.clone(),
    ))
}

async fn run_serve(config: FleetwatchConfig) -> anyhow::Result<()> {
    let health = build_service(&config)?;
    let router = fleetwatch_api::build_router(health);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));

    info!(%addr, "fleetwatch starting");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fleetwatch stopped");
    Ok(())
}

async fn run_check(config: FleetwatchConfig) -> anyhow::Result<ExitCode> {
    let health = build_service(&config)?;

    match health.build_report().await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Err(e) => {
            error!(error = %e, "health report unavailable");
            Ok(ExitCode::from(2))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
