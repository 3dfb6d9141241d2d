//! Scan report records for cluster resources: vulnerability, configuration
//! audit and benchmark reports, deep snapshots of them, and structural checks
//! that a report belongs to the owner and scanner it claims.

pub mod config;
pub mod core;
pub mod error;
pub mod matcher;
pub mod scanners;
pub mod scheme;
pub mod snapshot;

pub use error::{MatchError, Result};
pub use matcher::{MatchOutcome, ReportMatcher};
pub use snapshot::{Snapshot, snapshot};
