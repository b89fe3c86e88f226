//! Unit classifier — one unit's active state to a healthy/unhealthy verdict.
//!
//! Rules, first match wins:
//!
//! 1. `failed` → unhealthy
//! 2. `activating` → unhealthy (a unit stuck starting is in a failure loop)
//! 3. `inactive` and not exempt → unhealthy
//! 4. anything else → healthy
//!
//! Exemptions only ever soften rule 3. A unit's name is only consulted
//! by rule 3, so a nameless unit is malformed only when it is `inactive`.

use fleetwatch_core::{ActiveState, ClusterSnapshot, UnitState};

use crate::error::ClassifyError;
use crate::exemption::ExemptionPolicy;

/// Outcome of classifying one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    /// Unhealthy, with the operator-facing reason.
    Unhealthy(String),
}

impl Verdict {
    /// True for [`Verdict::Healthy`].
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    fn state(state: &ActiveState) -> Self {
        Self::Unhealthy(format!("Unit is in {state} state."))
    }
}

/// Classify one unit against the snapshot it was read from.
///
/// Fails only for an `inactive` unit with a blank name, since the
/// exemption lookup needs the name.
pub fn classify(
    unit: &UnitState,
    snapshot: &ClusterSnapshot,
    policy: &ExemptionPolicy,
) -> Result<Verdict, ClassifyError> {
    let verdict = match &unit.active_state {
        state @ (ActiveState::Failed | ActiveState::Activating) => Verdict::state(state),
        state @ ActiveState::Inactive => {
            if unit.name.trim().is_empty() {
                return Err(ClassifyError::MalformedUnit(format!(
                    "inactive unit on machine {:?} has no name",
                    unit.machine_id
                )));
            }
            if policy.is_exempt(&unit.name, snapshot) {
                Verdict::Healthy
            } else {
                Verdict::state(state)
            }
        }
        _ => Verdict::Healthy,
    };
    Ok(verdict)
}
