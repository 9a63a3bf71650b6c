//! Workflow outcomes returned to the command layer.

use std::fmt;

/// What the provisioner changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub role_created: bool,
    pub database_created: bool,
}

/// Result of the best-effort seeding step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    Skipped,
    Failed(String),
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedOutcome::Seeded => f.write_str("seeded"),
            SeedOutcome::Skipped => f.write_str("skipped"),
            SeedOutcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// What a hard reset removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub database_removed: bool,
    pub migrations_removed: usize,
}

/// What the upgrader changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReport {
    /// Present only when a hard reset ran.
    pub reset: Option<ResetSummary>,
    pub runtime_created: bool,
    pub dependencies_installed: bool,
    pub settings_patched: bool,
    pub asset_installed: bool,
    pub seed: SeedOutcome,
}

/// Connection details reported by `verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub engine: String,
    pub name: String,
    pub vendor: String,
    pub version: String,
}
