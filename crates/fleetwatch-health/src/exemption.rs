//! Exemption policy — which inactive units are expected to be idle.
//!
//! A deployment picks exactly one form:
//!
//! - **Companion**: `X.service` is exempt while `X.timer` is present in
//!   the same snapshot (the service is trigger-managed).
//! - **Patterns**: the unit name fully matches one of the configured
//!   regular expressions, instance suffix included.

use regex::Regex;
use tracing::debug;

use fleetwatch_core::{ClusterSnapshot, ConfigError, ConfigResult, ExemptionConfig, ExemptionMode};

const SERVICE_SUFFIX: &str = ".service";
const TIMER_SUFFIX: &str = ".timer";

/// Decides whether an inactive unit is expected to be idle.
#[derive(Debug, Clone, Default)]
pub enum ExemptionPolicy {
    /// `X.service` is exempt when `X.timer` is in the same snapshot.
    #[default]
    Companion,
    /// The unit name fully matches one of these anchored patterns.
    Patterns(Vec<Regex>),
}

impl ExemptionPolicy {
    /// Build the policy selected by configuration, compiling any patterns.
    pub fn from_config(config: &ExemptionConfig) -> ConfigResult<Self> {
        match config.mode {
            ExemptionMode::Companion => Ok(Self::Companion),
            ExemptionMode::Patterns => Self::patterns(&config.patterns),
        }
    }

    /// Compile a pattern policy. Each pattern must match the whole unit name.
    pub fn patterns<S: AsRef<str>>(patterns: &[S]) -> ConfigResult<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{p})$")).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self::Patterns(compiled))
    }

    /// Whether an inactive `unit_name` should be treated as expected.
    pub fn is_exempt(&self, unit_name: &str, snapshot: &ClusterSnapshot) -> bool {
        let exempt = match self {
            Self::Companion => companion_timer(unit_name)
                .is_some_and(|timer| snapshot.contains(&timer)),
            Self::Patterns(patterns) => patterns.iter().any(|re| re.is_match(unit_name)),
        };
        if exempt {
            debug!(unit = %unit_name, "inactive unit is exempt");
        }
        exempt
    }
}

/// Name of the timer that would drive `unit_name`, if it is a service.
pub fn companion_timer(unit_name: &str) -> Option<String> {
    unit_name
        .strip_suffix(SERVICE_SUFFIX)
        .map(|base| format!("{base}{TIMER_SUFFIX}"))
}
