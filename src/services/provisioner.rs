//! Database provisioning workflow.
//!
//! Ensures the application role and database exist, grants privileges,
//! installs the Postgres driver into the app runtime and migrates. Every
//! step is fail-fast; repeated runs converge without error.

use std::sync::Arc;

use crate::config::{Config, MANAGE_SCRIPT, POSTGRES_DRIVER_PACKAGE};
use crate::domain::{AdminConnection, ProvisionReport, ProvisionTarget};
use crate::errors::{AppError, AppResult};
use crate::infra::{run_checked, AdminCatalog, CommandRunner, CommandSpec};

/// Provisioning service
pub struct Provisioner {
    runner: Arc<dyn CommandRunner>,
    catalog: Arc<dyn AdminCatalog>,
    config: Config,
}

impl Provisioner {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        catalog: Arc<dyn AdminCatalog>,
        config: Config,
    ) -> Self {
        Self {
            runner,
            catalog,
            config,
        }
    }

    /// Run the whole workflow for `target` on the server behind `admin`.
    pub async fn run(
        &self,
        target: &ProvisionTarget,
        admin: &AdminConnection,
    ) -> AppResult<ProvisionReport> {
        if !self.runner.is_available(&self.config.psql).await {
            tracing::error!(
                tool = %self.config.psql,
                "Admin client not found; is PostgreSQL installed and on PATH?"
            );
            return Err(AppError::ToolNotFound(self.config.psql.clone()));
        }

        let report = self.ensure_catalog(target).await?;
        self.install_driver().await?;
        self.migrate(target, admin).await?;

        Ok(report)
    }

    /// Create the role and database if absent, then grant privileges.
    pub async fn ensure_catalog(&self, target: &ProvisionTarget) -> AppResult<ProvisionReport> {
        let mut report = ProvisionReport::default();

        if self.catalog.role_exists(&target.role).await? {
            tracing::info!(role = %target.role, "Role already exists");
        } else {
            self.catalog
                .create_role(&target.role, target.password())
                .await?;
            tracing::info!(role = %target.role, "Created role");
            report.role_created = true;
        }

        if self.catalog.database_exists(&target.database).await? {
            tracing::info!(database = %target.database, "Database already exists");
        } else {
            self.catalog
                .create_database(&target.database, &target.role)
                .await?;
            tracing::info!(database = %target.database, owner = %target.role, "Created database");
            report.database_created = true;
        }

        self.catalog
            .grant_all(&target.database, &target.role)
            .await?;
        tracing::info!(database = %target.database, role = %target.role, "Granted privileges");

        Ok(report)
    }

    async fn install_driver(&self) -> AppResult<()> {
        tracing::info!(package = POSTGRES_DRIVER_PACKAGE, "Installing database driver");
        let spec = CommandSpec::new(self.python())
            .args(["-m", "pip", "install", POSTGRES_DRIVER_PACKAGE])
            .current_dir(&self.config.project_dir);
        run_checked(self.runner.as_ref(), &spec).await?;
        Ok(())
    }

    async fn migrate(&self, target: &ProvisionTarget, admin: &AdminConnection) -> AppResult<()> {
        tracing::info!(database = %target.database, "Applying migrations");
        let mut spec = CommandSpec::new(self.python())
            .args([MANAGE_SCRIPT, "migrate", "--noinput"])
            .current_dir(&self.config.project_dir);
        for (key, value) in admin.migration_env(target) {
            spec = spec.env(key, value);
        }
        run_checked(self.runner.as_ref(), &spec).await?;
        Ok(())
    }

    fn python(&self) -> String {
        self.config.app_python()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use mockall::Sequence;

    use super::*;
    use crate::infra::{CommandOutput, MockAdminCatalog, MockCommandRunner};

    fn config() -> Config {
        Config::from_lookup(|_| None).with_project_dir("/nonexistent/crm")
    }

    fn target() -> ProvisionTarget {
        ProvisionTarget::new("crm_user", "pw", "crm_msui")
    }

    #[tokio::test]
    async fn test_missing_psql_aborts_before_any_statement() {
        let mut runner = MockCommandRunner::new();
        runner.expect_is_available().returning(|_| false);
        runner.expect_output().never();

        let mut catalog = MockAdminCatalog::new();
        catalog.expect_role_exists().never();

        let provisioner = Provisioner::new(Arc::new(runner), Arc::new(catalog), config());
        let err = provisioner
            .run(&target(), &AdminConnection::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ToolNotFound(tool) if tool == "psql"));
    }

    #[tokio::test]
    async fn test_creates_missing_role_and_database() {
        let mut seq = Sequence::new();
        let mut catalog = MockAdminCatalog::new();
        catalog
            .expect_role_exists()
            .with(eq("crm_user"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        catalog
            .expect_create_role()
            .with(eq("crm_user"), eq("pw"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        catalog
            .expect_database_exists()
            .with(eq("crm_msui"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        catalog
            .expect_create_database()
            .with(eq("crm_msui"), eq("crm_user"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        catalog
            .expect_grant_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let provisioner = Provisioner::new(
            Arc::new(MockCommandRunner::new()),
            Arc::new(catalog),
            config(),
        );
        let report = provisioner.ensure_catalog(&target()).await.unwrap();

        assert!(report.role_created);
        assert!(report.database_created);
    }

    #[tokio::test]
    async fn test_existing_objects_are_not_recreated() {
        let mut catalog = MockAdminCatalog::new();
        catalog.expect_role_exists().returning(|_| Ok(true));
        catalog.expect_create_role().never();
        catalog.expect_database_exists().returning(|_| Ok(true));
        catalog.expect_create_database().never();
        catalog.expect_grant_all().times(1).returning(|_, _| Ok(()));

        let provisioner = Provisioner::new(
            Arc::new(MockCommandRunner::new()),
            Arc::new(catalog),
            config(),
        );
        let report = provisioner.ensure_catalog(&target()).await.unwrap();

        assert_eq!(report, ProvisionReport::default());
    }

    #[tokio::test]
    async fn test_migration_failure_is_fatal() {
        let mut runner = MockCommandRunner::new();
        runner.expect_is_available().returning(|_| true);
        runner.expect_output().returning(|spec: &CommandSpec| {
            if spec.args.iter().any(|a| a == "migrate") {
                Ok(CommandOutput::failed(1, "relation does not exist"))
            } else {
                Ok(CommandOutput::ok(""))
            }
        });

        let mut catalog = MockAdminCatalog::new();
        catalog.expect_role_exists().returning(|_| Ok(true));
        catalog.expect_database_exists().returning(|_| Ok(true));
        catalog.expect_grant_all().returning(|_, _| Ok(()));

        let provisioner = Provisioner::new(Arc::new(runner), Arc::new(catalog), config());
        let err = provisioner
            .run(&target(), &AdminConnection::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CommandFailed { .. }));
    }
}
