//! Postgres role/database catalog access through the admin client.

use std::sync::Arc;

use async_trait::async_trait;

use super::process::{run_checked, CommandRunner, CommandSpec};
use crate::config::{ENV_PGPASSWORD, MAINTENANCE_DATABASE};
use crate::domain::sql;
use crate::domain::AdminConnection;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Administrative operations on the server catalog.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminCatalog: Send + Sync {
    async fn role_exists(&self, role: &str) -> AppResult<bool>;

    async fn create_role(&self, role: &str, password: &str) -> AppResult<()>;

    async fn database_exists(&self, database: &str) -> AppResult<bool>;

    async fn create_database(&self, database: &str, owner: &str) -> AppResult<()>;

    async fn grant_all(&self, database: &str, role: &str) -> AppResult<()>;
}

/// [`AdminCatalog`] that pipes statements into `psql`.
pub struct PsqlCatalog {
    runner: Arc<dyn CommandRunner>,
    psql: String,
    admin: AdminConnection,
}

impl PsqlCatalog {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        psql: impl Into<String>,
        admin: AdminConnection,
    ) -> Self {
        Self {
            runner,
            psql: psql.into(),
            admin,
        }
    }

    /// Invocation for one statement, fed on stdin so secrets stay off argv.
    pub fn statement(&self, sql: String) -> CommandSpec {
        let port = self.admin.port.to_string();
        CommandSpec::new(self.psql.as_str())
            .args([
                "-X",
                "-q",
                "-t",
                "-A",
                "-v",
                "ON_ERROR_STOP=1",
                "-h",
                self.admin.host.as_str(),
                "-p",
                port.as_str(),
                "-U",
                self.admin.user.as_str(),
                "-d",
                MAINTENANCE_DATABASE,
                "-f",
                "-",
            ])
            .env(ENV_PGPASSWORD, self.admin.password())
            .stdin(sql)
            .quiet()
    }

    async fn exists(&self, query: String) -> AppResult<bool> {
        let output = run_checked(self.runner.as_ref(), &self.statement(query)).await?;
        Ok(output.stdout.trim() == "1")
    }

    async fn execute(&self, statement: String) -> AppResult<()> {
        run_checked(self.runner.as_ref(), &self.statement(statement)).await?;
        Ok(())
    }
}

#[async_trait]
impl AdminCatalog for PsqlCatalog {
    async fn role_exists(&self, role: &str) -> AppResult<bool> {
        self.exists(sql::role_exists_query(role)).await
    }

    async fn create_role(&self, role: &str, password: &str) -> AppResult<()> {
        self.execute(sql::create_role(role, password)).await
    }

    async fn database_exists(&self, database: &str) -> AppResult<bool> {
        self.exists(sql::database_exists_query(database)).await
    }

    async fn create_database(&self, database: &str, owner: &str) -> AppResult<()> {
        self.execute(sql::create_database(database, owner)).await
    }

    async fn grant_all(&self, database: &str, role: &str) -> AppResult<()> {
        self.execute(sql::grant_all(database, role)).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::function;

    use super::*;
    use crate::infra::process::{CommandOutput, MockCommandRunner};

    fn admin() -> AdminConnection {
        AdminConnection::new("db.local", 5433, "admin", "rootpw")
    }

    #[test]
    fn test_statement_targets_maintenance_database() {
        let catalog = PsqlCatalog::new(Arc::new(MockCommandRunner::new()), "psql", admin());
        let spec = catalog.statement("SELECT 1;".to_string());

        assert_eq!(spec.program, "psql");
        assert!(spec.args.windows(2).any(|w| w == ["-h", "db.local"]));
        assert!(spec.args.windows(2).any(|w| w == ["-p", "5433"]));
        assert!(spec.args.windows(2).any(|w| w == ["-U", "admin"]));
        assert!(spec.args.windows(2).any(|w| w == ["-d", "postgres"]));
        assert_eq!(spec.env_value("PGPASSWORD"), Some("rootpw"));
        assert!(!spec.args.iter().any(|a| a.contains("rootpw")));
        assert_eq!(spec.stdin.as_deref(), Some("SELECT 1;"));
        assert!(spec.quiet);
    }

    #[tokio::test]
    async fn test_role_exists_reads_single_row() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .with(function(|spec: &CommandSpec| {
                spec.stdin
                    .as_deref()
                    .is_some_and(|s| s.contains("pg_roles"))
            }))
            .returning(|_| Ok(CommandOutput::ok("1\n")));

        let catalog = PsqlCatalog::new(Arc::new(runner), "psql", admin());
        assert!(catalog.role_exists("crm_user").await.unwrap());
    }

    #[tokio::test]
    async fn test_database_missing_when_no_rows() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_| Ok(CommandOutput::ok("")));

        let catalog = PsqlCatalog::new(Arc::new(runner), "psql", admin());
        assert!(!catalog.database_exists("crm_msui").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_role_propagates_failure() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_| Ok(CommandOutput::failed(1, "permission denied")));

        let catalog = PsqlCatalog::new(Arc::new(runner), "psql", admin());
        assert!(catalog.create_role("crm_user", "pw").await.is_err());
    }
}
