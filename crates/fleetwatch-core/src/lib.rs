//! fleetwatch-core — shared domain types and configuration for Fleetwatch.
//!
//! Holds the unit-state snapshot model consumed by the health engine and
//! the startup configuration surface (fleet endpoint, proxy, exemption
//! mode). Configuration is loaded once and treated as immutable for the
//! lifetime of the process.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ExemptionConfig, ExemptionMode, FleetwatchConfig, ReportConfig, TimeoutConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
