//! Domain layer - Provisioning targets and reports
//!
//! Plain value types shared by the services. Nothing here performs I/O.

pub mod provision;
pub mod report;
pub mod sql;

pub use provision::{AdminConnection, ProvisionTarget};
pub use report::{ProvisionReport, ResetSummary, SeedOutcome, UpgradeReport, VerifyReport};
