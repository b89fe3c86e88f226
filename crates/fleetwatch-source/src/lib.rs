//! fleetwatch-source — where unit states come from.
//!
//! The health engine reads the cluster exactly once per report through
//! the [`StateSource`] trait. Two implementations ship here:
//!
//! - [`FleetApiClient`] talks to the fleet v1 HTTP API, optionally via a
//!   SOCKS5 proxy, and follows pagination until the full state list is read.
//! - [`StaticSource`] returns a fixed snapshot (or a fixed failure) and is
//!   used by tests and by callers that already hold a snapshot.

pub mod error;
pub mod fleet;
pub mod fixed;

use std::future::Future;
use std::pin::Pin;

use fleetwatch_core::ClusterSnapshot;

pub use error::{SourceError, SourceResult};
pub use fixed::StaticSource;
pub use fleet::FleetApiClient;

/// Boxed future returned by [`StateSource::fetch_unit_states`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = SourceResult<ClusterSnapshot>> + Send + 'a>>;

/// A supplier of the current unit states for the whole cluster.
///
/// Implementations must treat each call as one atomic read and must not
/// retry internally; callers re-poll on their own schedule.
pub trait StateSource: Send + Sync {
    fn fetch_unit_states(&self) -> FetchFuture<'_>;
}
