//! fleetwatch-api — HTTP surface for the aggregate health report.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Aggregate health report |
//! | GET | `/__health` | Same report, conventional health path |
//!
//! A report with unhealthy units is still a successful response (200);
//! only a failure to read unit states yields 503.

pub mod handlers;
pub mod logging;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use fleetwatch_health::HealthService;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub health: HealthService,
}

/// Build the router serving the health report.
pub fn build_router(health: HealthService) -> Router {
    let state = ApiState { health };

    Router::new()
        .route("/", get(handlers::health_report))
        .route("/__health", get(handlers::health_report))
        .with_state(state)
        .layer(middleware::from_fn(logging::log_request))
}
