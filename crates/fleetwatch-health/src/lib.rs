//! fleetwatch-health — turns a snapshot of unit states into one health report.
//!
//! # Architecture
//!
//! ```text
//! HealthService::build_report()
//!   ├── StateSource::fetch_unit_states()      (exactly one read)
//!   ├── check::build_checks()                 (one descriptor per unit)
//!   │   ├── category::lookup()                (severity + impact text)
//!   │   └── checker closure → classifier::classify()
//!   │                           └── ExemptionPolicy::is_exempt()
//!   └── aggregator::aggregate()               (parallel, panic-contained)
//!         └── AggregateReport
//! ```
//!
//! # Classification
//!
//! `failed` and `activating` units are always unhealthy. An `inactive`
//! unit is unhealthy unless the exemption policy says it is expected to
//! be idle, either because a companion `.timer` unit drives it or because
//! its name matches an administratively configured pattern. Everything
//! else is healthy.
//!
//! Each request is evaluated from a fresh snapshot; nothing is cached
//! between reports.

pub mod aggregator;
pub mod category;
pub mod check;
pub mod classifier;
pub mod error;
pub mod exemption;
pub mod report;
pub mod service;

pub use aggregator::aggregate;
pub use category::{Category, lookup};
pub use check::{CheckDescriptor, Checker, build_check, build_checks};
pub use classifier::{Verdict, classify};
pub use error::{ClassifyError, ReportError, ReportResult};
pub use exemption::ExemptionPolicy;
pub use report::{AggregateReport, CheckOutcome};
pub use service::{HealthService, evaluate};
