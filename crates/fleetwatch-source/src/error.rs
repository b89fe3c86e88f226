//! State source error types.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for state source reads.
pub type SourceResult<T> = Result<T, SourceError>;

/// Reasons a unit-state read can fail. Any of these makes the whole
/// report unavailable.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("invalid fleet endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("fleet request failed: {0}")]
    Transport(String),

    #[error("fleet returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode fleet response: {0}")]
    Decode(String),

    #[error("fleet pagination exceeded {0} pages")]
    TooManyPages(usize),

    #[error("fleet state read did not finish within {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Unavailable(String),
}
