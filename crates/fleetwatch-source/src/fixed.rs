//! In-memory state source.

use std::sync::atomic::{AtomicUsize, Ordering};

use fleetwatch_core::ClusterSnapshot;

use crate::error::{SourceError, SourceResult};
use crate::{FetchFuture, StateSource};

/// Returns the same snapshot (or the same failure) on every read and
/// counts how many reads were made.
#[derive(Debug)]
pub struct StaticSource {
    result: SourceResult<ClusterSnapshot>,
    fetches: AtomicUsize,
}

impl StaticSource {
    /// A source whose every read returns `snapshot`.
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            result: Ok(snapshot),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose every read fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            result: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of reads served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl StateSource for StaticSource {
    fn fetch_unit_states(&self) -> FetchFuture<'_> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_core::UnitState;

    #[tokio::test]
    async fn returns_snapshot_and_counts_reads() {
        let snapshot = ClusterSnapshot::from_units([UnitState::new("a.service", "m", "active")]);
        let source = StaticSource::new(snapshot.clone());

        assert_eq!(source.fetch_unit_states().await.unwrap(), snapshot);
        assert_eq!(source.fetch_unit_states().await.unwrap(), snapshot);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn failing_source_returns_error() {
        let source = StaticSource::failing(SourceError::Unavailable("down".to_string()));
        let err = source.fetch_unit_states().await.unwrap_err();
        assert_eq!(err.to_string(), "down");
        assert_eq!(source.fetch_count(), 1);
    }
}
