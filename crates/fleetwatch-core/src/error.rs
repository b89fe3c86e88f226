//! Configuration error types.

use thiserror::Error;

/// Result type alias for configuration loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup configuration problems. All of these are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("fleet endpoint is required")]
    MissingEndpoint,

    #[error("invalid fleet endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid socks proxy {address:?}: expected host:port")]
    InvalidProxy { address: String },

    #[error("invalid exemption pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("exemption patterns given but exemption mode is companion")]
    PatternsInCompanionMode,

    #[error("exemption mode is patterns but no patterns were given")]
    NoPatterns,

    #[error("timeout {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}
