//! Report building — one source read, one check per unit, one report.

use std::sync::Arc;

use tracing::{info, warn};

use fleetwatch_core::{ClusterSnapshot, ReportConfig};
use fleetwatch_source::StateSource;

use crate::aggregator::aggregate;
use crate::check::build_checks;
use crate::error::{ReportError, ReportResult};
use crate::exemption::ExemptionPolicy;
use crate::report::{AggregateReport, CheckOutcome};

/// Evaluate every unit in a snapshot. Pure apart from the timestamp.
pub async fn evaluate(snapshot: ClusterSnapshot, policy: &Arc<ExemptionPolicy>) -> Vec<CheckOutcome> {
    let snapshot = Arc::new(snapshot);
    aggregate(build_checks(&snapshot, policy)).await
}

/// Builds health reports on demand. Holds no per-request state.
#[derive(Clone)]
pub struct HealthService {
    source: Arc<dyn StateSource>,
    policy: Arc<ExemptionPolicy>,
    report: ReportConfig,
}

impl HealthService {
    /// Service reading from `source` and exempting with `policy`.
    pub fn new(source: Arc<dyn StateSource>, policy: ExemptionPolicy, report: ReportConfig) -> Self {
        Self {
            source,
            policy: Arc::new(policy),
            report,
        }
    }

    /// Read the cluster once and evaluate it.
    ///
    /// A failed read fails the whole report; there is no retry and no
    /// fallback to earlier results.
    pub async fn build_report(&self) -> ReportResult<AggregateReport> {
        let snapshot = self.source.fetch_unit_states().await.map_err(|e| {
            warn!(error = %e, "failed to read unit states");
            ReportError::SourceUnavailable(e)
        })?;

        let units = snapshot.len();
        let checks = evaluate(snapshot, &self.policy).await;
        let report = AggregateReport::new(&self.report.title, &self.report.description, checks);

        info!(
            units,
            unhealthy = report.failing().count(),
            ok = report.healthy,
            "health report built"
        );
        Ok(report)
    }
}
