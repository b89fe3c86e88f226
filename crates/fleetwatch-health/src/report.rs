//! Aggregate health report in the FT health-check JSON schema.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::check::CheckDescriptor;

/// `schemaVersion` of every report.
pub const SCHEMA_VERSION: u8 = 1;

/// Result of one unit's check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    /// `<unit name>_<machine id>`.
    pub name: String,
    #[serde(rename = "ok")]
    pub healthy: bool,
    /// Category severity, 1 most critical.
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    /// Why the check failed; empty on the wire when healthy.
    #[serde(rename = "checkOutput", serialize_with = "empty_if_none")]
    pub reason: Option<String>,
    /// When the aggregation that produced this outcome started.
    pub last_updated: DateTime<Utc>,
}

impl CheckOutcome {
    /// Combine a descriptor's metadata with its checker's result.
    pub fn new(descriptor: &CheckDescriptor, result: Result<(), String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            name: descriptor.key.clone(),
            healthy: result.is_ok(),
            severity: descriptor.severity,
            business_impact: descriptor.business_impact.to_string(),
            technical_summary: descriptor.technical_summary.to_string(),
            panic_guide: descriptor.panic_guide.to_string(),
            reason: result.err(),
            last_updated: checked_at,
        }
    }
}

/// The single document produced per report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub schema_version: u8,
    #[serde(rename = "name")]
    pub title: String,
    pub description: String,
    pub checks: Vec<CheckOutcome>,
    /// True when every check is healthy, including when there are none.
    #[serde(rename = "ok")]
    pub healthy: bool,
    /// Most critical severity among failing checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
}

impl AggregateReport {
    /// Assemble a report, deriving `ok` and the overall severity from `checks`.
    pub fn new(title: impl Into<String>, description: impl Into<String>, checks: Vec<CheckOutcome>) -> Self {
        let healthy = checks.iter().all(|c| c.healthy);
        let severity = checks.iter().filter(|c| !c.healthy).map(|c| c.severity).min();
        Self {
            schema_version: SCHEMA_VERSION,
            title: title.into(),
            description: description.into(),
            checks,
            healthy,
            severity,
        }
    }

    /// Unhealthy checks, in report order.
    pub fn failing(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.healthy)
    }

    /// Look up a check by its `<name>_<machine id>` key.
    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
