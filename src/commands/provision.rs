//! Provision command - Database role/database setup and migration.

use std::sync::Arc;

use crate::cli::args::ProvisionArgs;
use crate::config::Config;
use crate::domain::{AdminConnection, ProvisionTarget};
use crate::errors::AppResult;
use crate::infra::{CommandRunner, PsqlCatalog, SystemRunner};
use crate::services::Provisioner;

/// Execute the provision command
pub async fn execute(args: ProvisionArgs, config: Config) -> AppResult<()> {
    let target = ProvisionTarget::new(args.db_user, args.db_password, args.db_name);
    let admin = AdminConnection::new(args.host, args.port, args.admin_user, args.admin_password);

    tracing::info!(
        database = %target.database,
        role = %target.role,
        host = %admin.host,
        port = admin.port,
        "Provisioning database"
    );

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    let catalog = Arc::new(PsqlCatalog::new(
        runner.clone(),
        config.psql.clone(),
        admin.clone(),
    ));

    let report = Provisioner::new(runner, catalog, config)
        .run(&target, &admin)
        .await?;

    println!("\n=== Provisioning Complete ===");
    println!(
        "Role:      {} ({})",
        target.role,
        if report.role_created { "created" } else { "existing" }
    );
    println!(
        "Database:  {} ({})",
        target.database,
        if report.database_created { "created" } else { "existing" }
    );
    println!("Server:    {}:{}", admin.host, admin.port);
    println!("=============================\n");

    Ok(())
}
