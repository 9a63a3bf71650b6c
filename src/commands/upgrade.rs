//! Upgrade command - Local environment refresh.
//!
//! ## Usage
//!
//! ```bash
//! # Full upgrade with demo data
//! crm-ops upgrade
//!
//! # Recover from broken migrations without loading demo data
//! crm-ops upgrade --hard-reset --skip-seed
//! ```

use std::sync::Arc;

use crate::cli::args::UpgradeArgs;
use crate::config::Config;
use crate::domain::SeedOutcome;
use crate::errors::AppResult;
use crate::infra::SystemRunner;
use crate::services::{UpgradeOptions, Upgrader};

/// Execute the upgrade command
pub async fn execute(args: UpgradeArgs, config: Config) -> AppResult<()> {
    let options = UpgradeOptions {
        skip_seed: args.skip_seed,
        hard_reset: args.hard_reset,
    };
    tracing::info!(project = %config.project_dir.display(), ?options, "Upgrading environment");

    let report = Upgrader::new(Arc::new(SystemRunner::new()), config)
        .run(options)
        .await?;

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!("\n=== Upgrade Complete ===");
    match report.reset {
        Some(reset) => println!(
            "Hard reset:        database {}, {} migration(s) removed",
            if reset.database_removed { "removed" } else { "absent" },
            reset.migrations_removed
        ),
        None => println!("Hard reset:        no"),
    }
    println!("Runtime created:   {}", yes_no(report.runtime_created));
    println!("Dependencies:      {}", yes_no(report.dependencies_installed));
    println!("Settings patched:  {}", yes_no(report.settings_patched));
    println!("Asset installed:   {}", yes_no(report.asset_installed));
    println!("Demo data:         {}", report.seed);
    println!("========================\n");

    if let SeedOutcome::Failed(_) = report.seed {
        tracing::warn!("Upgrade finished without demo data");
    }

    Ok(())
}
