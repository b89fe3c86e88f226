//! Check descriptors — one per unit, pairing category metadata with a
//! deferred classification.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::error;

use fleetwatch_core::{ClusterSnapshot, UnitState};

use crate::category::lookup;
use crate::classifier::{Verdict, classify};
use crate::exemption::ExemptionPolicy;

/// Deferred evaluation of one check. `Err` carries the reason it failed.
pub type Checker = Arc<dyn Fn() -> Result<(), String> + Send + Sync>;

/// Everything needed to run and report one unit's check.
#[derive(Clone)]
pub struct CheckDescriptor {
    /// `<unit name>_<machine id>`.
    pub key: String,
    pub category: &'static str,
    pub severity: u8,
    pub technical_summary: &'static str,
    pub business_impact: &'static str,
    pub panic_guide: &'static str,
    pub checker: Checker,
}

impl fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("key", &self.key)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl CheckDescriptor {
    /// Replace the checker, keeping the metadata.
    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = checker;
        self
    }
}

/// Internal-error reason used for failures of the health engine itself.
pub(crate) fn internal_error(detail: impl fmt::Display) -> String {
    format!("internal error: {detail}")
}

/// Build the check for one unit.
///
/// The checker classifies lazily against the shared snapshot, so building
/// checks does no evaluation work.
pub fn build_check(
    unit: &UnitState,
    snapshot: &Arc<ClusterSnapshot>,
    policy: &Arc<ExemptionPolicy>,
) -> CheckDescriptor {
    let category = lookup(&unit.name);

    let unit_owned = unit.clone();
    let snapshot = Arc::clone(snapshot);
    let policy = Arc::clone(policy);
    let checker: Checker = Arc::new(move || match classify(&unit_owned, &snapshot, &policy) {
        Ok(Verdict::Healthy) => Ok(()),
        Ok(Verdict::Unhealthy(reason)) => Err(reason),
        Err(e) => Err(internal_error(e)),
    });

    CheckDescriptor {
        key: unit.check_key(),
        category: category.name,
        severity: category.severity,
        technical_summary: category.technical_summary,
        business_impact: category.business_impact,
        panic_guide: category.panic_guide,
        checker,
    }
}

/// Build one check per unit, in snapshot order.
///
/// Two units producing the same key are both kept; the later one reports
/// an internal error instead of silently shadowing the first.
pub fn build_checks(
    snapshot: &Arc<ClusterSnapshot>,
    policy: &Arc<ExemptionPolicy>,
) -> Vec<CheckDescriptor> {
    let mut seen = HashSet::with_capacity(snapshot.len());
    snapshot
        .iter()
        .map(|unit| {
            let check = build_check(unit, snapshot, policy);
            if seen.insert(check.key.clone()) {
                return check;
            }
            error!(key = %check.key, unit = %unit.name, "duplicate check name");
            let reason = internal_error(format!("duplicate check name {}", check.key));
            check.with_checker(Arc::new(move || -> Result<(), String> { Err(reason.clone()) }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(units: Vec<UnitState>) -> Arc<ClusterSnapshot> {
        Arc::new(ClusterSnapshot::from_units(units))
    }

    #[test]
    fn build_check_uses_category_metadata() {
        let snapshot = shared(vec![UnitState::new("vulcan-router.service", "m-9", "failed")]);
        let policy = Arc::new(ExemptionPolicy::Companion);
        let unit = snapshot.get("vulcan-router.service").unwrap();

        let check = build_check(unit, &snapshot, &policy);

        assert_eq!(check.key, "vulcan-router.service_m-9");
        assert_eq!(check.category, "routing");
        assert_eq!(check.severity, 1);
        assert_eq!(check.technical_summary, "Vulcan routes requests, restart required");
        assert_eq!((check.checker)(), Err("Unit is in failed state.".to_string()));
    }

    #[test]
    fn build_checks_follows_snapshot_order() {
        let snapshot = shared(vec![
            UnitState::new("zookeeper.service", "m", "active"),
            UnitState::new("deployer.timer", "m", "active"),
            UnitState::new("deployer.service", "m", "inactive"),
        ]);
        let policy = Arc::new(ExemptionPolicy::Companion);

        let checks = build_checks(&snapshot, &policy);

        let keys: Vec<&str> = checks.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["deployer.service_m", "deployer.timer_m", "zookeeper.service_m"]);
        assert!(checks.iter().all(|c| (c.checker)().is_ok()));
    }

    #[test]
    fn duplicate_keys_are_reported() {
        // "a_b" on "c" and "a" on "b_c" both produce "a_b_c".
        let snapshot = shared(vec![
            UnitState::new("a", "b_c", "active"),
            UnitState::new("a_b", "c", "active"),
        ]);
        let policy = Arc::new(ExemptionPolicy::Companion);

        let checks = build_checks(&snapshot, &policy);

        assert_eq!(checks.len(), 2);
        assert_eq!((checks[0].checker)(), Ok(()));
        let err = (checks[1].checker)().unwrap_err();
        assert!(err.starts_with("internal error: duplicate check name a_b_c"), "{err}");
    }

    #[test]
    fn malformed_unit_becomes_internal_error() {
        let snapshot = shared(vec![UnitState::new("", "m", "inactive")]);
        let policy = Arc::new(ExemptionPolicy::Companion);

        let checks = build_checks(&snapshot, &policy);

        let err = (checks[0].checker)().unwrap_err();
        assert!(err.starts_with("internal error: malformed unit"), "{err}");
    }

    #[test]
    fn debug_omits_checker() {
        let snapshot = shared(vec![UnitState::new("kafka.service", "m", "active")]);
        let policy = Arc::new(ExemptionPolicy::Companion);
        let check = build_check(snapshot.get("kafka.service").unwrap(), &snapshot, &policy);
        let debug = format!("{check:?}");
        assert!(debug.contains("kafka.service_m"));
        assert!(debug.contains(".."));
    }
}
