//! Database connection used to verify the configured backend.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseBackend, DatabaseConnection,
    DbErr, Statement,
};

use crate::config::{Config, DbEngine};
use crate::domain::VerifyReport;
use crate::errors::AppResult;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
    engine: DbEngine,
    name: String,
}

impl Database {
    /// Connect with the credentials from configuration.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url()?);
        options.max_connections(1).sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;

        let name = match config.db_engine {
            DbEngine::Postgres => config.db_name.clone(),
            DbEngine::Sqlite => config.sqlite_path().display().to_string(),
        };

        Ok(Self {
            connection,
            engine: config.db_engine,
            name,
        })
    }

    /// Report engine, database name, vendor and server version.
    pub async fn describe(&self) -> AppResult<VerifyReport> {
        let backend = self.connection.get_database_backend();

        let (sql, vendor) = match backend {
            DatabaseBackend::Postgres => (
                "SELECT current_database() AS name, version() AS version",
                "postgresql",
            ),
            DatabaseBackend::Sqlite => (
                "SELECT 'main' AS name, sqlite_version() AS version",
                "sqlite",
            ),
            DatabaseBackend::MySql => ("SELECT database() AS name, version() AS version", "mysql"),
        };

        let row = self
            .connection
            .query_one(Statement::from_string(backend, sql.to_string()))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("server returned no version row".to_string()))?;

        let reported_name: String = row.try_get("", "name")?;
        let version: String = row.try_get("", "version")?;

        let name = match self.engine {
            DbEngine::Postgres => reported_name,
            DbEngine::Sqlite => self.name.clone(),
        };

        Ok(VerifyReport {
            engine: self.engine.to_string(),
            name,
            vendor: vendor.to_string(),
            version,
        })
    }
}
