//! Verify command - Database connectivity check.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the verify command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!(engine = %config.db_engine, "Connecting to database...");

    let db = Database::connect(&config).await?;
    let report = db.describe().await?;

    println!("ENGINE:  {}", report.engine);
    println!("NAME:    {}", report.name);
    println!("VENDOR:  {}", report.vendor);
    println!("VERSION: {}", report.version);

    Ok(())
}
