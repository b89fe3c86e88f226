//! Parallel aggregator — runs every check concurrently and collects the
//! outcomes in input order.
//!
//! Checks are pure computations over an already-fetched snapshot, so each
//! runs as its own tokio task with no per-task timeout. A panicking check
//! is caught and reported as that one check failing with an internal
//! error; the rest of the report is unaffected. Dropping the returned
//! future aborts checks that have not started yet.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::check::{CheckDescriptor, Checker, internal_error};
use crate::report::CheckOutcome;

/// Run all checks and return one outcome per descriptor, in the same order.
pub async fn aggregate(descriptors: Vec<CheckDescriptor>) -> Vec<CheckOutcome> {
    let checked_at = Utc::now();
    let mut results: Vec<Option<Result<(), String>>> = vec![None; descriptors.len()];

    let mut tasks = JoinSet::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let checker = descriptor.checker.clone();
        let key = descriptor.key.clone();
        tasks.spawn(async move { (index, run_checker(&key, &checker)) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => error!(error = %e, "check task did not complete"),
        }
    }

    let outcomes: Vec<CheckOutcome> = descriptors
        .iter()
        .zip(results)
        .map(|(descriptor, result)| {
            let result = result.unwrap_or_else(|| Err(internal_error("check did not complete")));
            CheckOutcome::new(descriptor, result, checked_at)
        })
        .collect();

    debug!(
        checks = outcomes.len(),
        unhealthy = outcomes.iter().filter(|o| !o.healthy).count(),
        "aggregation complete"
    );
    outcomes
}

fn run_checker(key: &str, checker: &Checker) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| checker())) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%key, panic = %message, "check panicked");
            Err(internal_error(format!("check panicked: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
