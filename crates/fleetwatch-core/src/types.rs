//! Domain types for unit-state snapshots.
//!
//! A `ClusterSnapshot` is built once per evaluation from whatever the
//! scheduler reports and is read-only afterwards. Field names on
//! `UnitState` follow the fleet v1 wire format.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Scheduler-assigned unit name, e.g. `deployer.service` or `mongo-backup@1.service`.
pub type UnitName = String;

/// Opaque identifier of the machine a unit runs on.
pub type MachineId = String;

// ── Active state ───────────────────────────────────────────────────

/// systemd active state as reported by the scheduler.
///
/// Unknown values are kept verbatim in `Other` so a newer scheduler
/// never breaks deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActiveState {
    Active,
    Activating,
    Deactivating,
    Reloading,
    Inactive,
    Failed,
    Other(String),
}

impl ActiveState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Activating => "activating",
            Self::Deactivating => "deactivating",
            Self::Reloading => "reloading",
            Self::Inactive => "inactive",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ActiveState {
    fn from(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "activating" => Self::Activating,
            "deactivating" => Self::Deactivating,
            "reloading" => Self::Reloading,
            "inactive" => Self::Inactive,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ActiveState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ActiveState> for String {
    fn from(state: ActiveState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Unit state ─────────────────────────────────────────────────────

/// Run-state of a single deployed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    pub name: UnitName,
    #[serde(rename = "machineID", default)]
    pub machine_id: MachineId,
    #[serde(rename = "systemdActiveState")]
    pub active_state: ActiveState,
    #[serde(rename = "systemdLoadState", default, skip_serializing_if = "Option::is_none")]
    pub load_state: Option<String>,
    #[serde(rename = "systemdSubState", default, skip_serializing_if = "Option::is_none")]
    pub sub_state: Option<String>,
}

impl UnitState {
    /// Build a unit state with only the fields the health engine reads.
    pub fn new(
        name: impl Into<UnitName>,
        machine_id: impl Into<MachineId>,
        active_state: impl Into<ActiveState>,
    ) -> Self {
        Self {
            name: name.into(),
            machine_id: machine_id.into(),
            active_state: active_state.into(),
            load_state: None,
            sub_state: None,
        }
    }

    /// Name of this unit's check in the report: `<name>_<machine id>`.
    pub fn check_key(&self) -> String {
        format!("{}_{}", self.name, self.machine_id)
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// All unit states from one scheduler read, keyed by unit name.
///
/// Iteration is ordered by name, which makes report order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSnapshot {
    units: BTreeMap<UnitName, UnitState>,
}

impl ClusterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of states. Repeated names keep the last one.
    pub fn from_units(units: impl IntoIterator<Item = UnitState>) -> Self {
        let mut snapshot = Self::new();
        for unit in units {
            snapshot.insert(unit);
        }
        snapshot
    }

    /// Insert a unit, replacing (and warning about) any earlier unit of the same name.
    pub fn insert(&mut self, unit: UnitState) {
        if let Some(previous) = self.units.insert(unit.name.clone(), unit) {
            warn!(
                unit = %previous.name,
                machine_id = %previous.machine_id,
                "scheduler reported unit name twice; keeping the last state"
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&UnitState> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.units.values()
    }
}

impl FromIterator<UnitState> for ClusterSnapshot {
    fn from_iter<I: IntoIterator<Item = UnitState>>(iter: I) -> Self {
        Self::from_units(iter)
    }
}
