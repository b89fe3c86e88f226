//! Health engine error types.

use fleetwatch_source::SourceError;
use thiserror::Error;

/// Result type alias for report building.
pub type ReportResult<T> = Result<T, ReportError>;

/// Failure to produce a report at all. Unhealthy units are not an error;
/// they are a successful report with negative content.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unit states unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

/// A unit that could not be classified. Contained to that unit's check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("malformed unit: {0}")]
    MalformedUnit(String),
}
