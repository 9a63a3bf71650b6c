//! Application settings loaded from environment variables.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use super::constants::{
    DEFAULT_APP_LABEL, DEFAULT_DB_ENGINE, DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PASSWORD,
    DEFAULT_DB_PORT, DEFAULT_DB_USER, DEFAULT_HOST_PYTHON, DEFAULT_PSQL,
    DEFAULT_REQUIREMENTS_FILE, DEFAULT_SEED_COMMAND, DEFAULT_SETTINGS_FILE, DEFAULT_VENV_DIR,
    ENGINE_POSTGRES, ENGINE_SQLITE, SQLITE_DATABASE_FILE, STATIC_ROOT_DIR,
};
use crate::errors::{AppError, AppResult};

/// Database engine selected through `DB_ENGINE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

impl DbEngine {
    /// Interpret a `DB_ENGINE` value the way the app settings do:
    /// `postgresql` selects Postgres, anything else the SQLite fallback.
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case(ENGINE_POSTGRES) {
            DbEngine::Postgres
        } else {
            DbEngine::Sqlite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbEngine::Postgres => ENGINE_POSTGRES,
            DbEngine::Sqlite => ENGINE_SQLITE,
        }
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub venv_dir: PathBuf,
    pub host_python: String,
    pub psql: String,
    pub app_label: String,
    pub settings_file: PathBuf,
    pub requirements_file: PathBuf,
    pub seed_command: String,
    pub db_engine: DbEngine,
    pub db_name: String,
    /// SQLite file, relative to the project root unless absolute
    pub sqlite_file: PathBuf,
    pub db_user: String,
    db_password: String,
    pub db_host: String,
    pub db_port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project_dir", &self.project_dir)
            .field("venv_dir", &self.venv_dir)
            .field("host_python", &self.host_python)
            .field("psql", &self.psql)
            .field("app_label", &self.app_label)
            .field("settings_file", &self.settings_file)
            .field("requirements_file", &self.requirements_file)
            .field("seed_command", &self.seed_command)
            .field("db_engine", &self.db_engine)
            .field("db_name", &self.db_name)
            .field("sqlite_file", &self.sqlite_file)
            .field("db_user", &self.db_user)
            .field("db_password", &"[REDACTED]")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Missing or unparsable values fall back to the defaults in
    /// [`crate::config`]. With the SQLite engine, `DB_NAME` names the
    /// database file.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db_engine = DbEngine::from_setting(&var("DB_ENGINE", DEFAULT_DB_ENGINE));
        let sqlite_file = match db_engine {
            DbEngine::Sqlite => var("DB_NAME", SQLITE_DATABASE_FILE),
            DbEngine::Postgres => SQLITE_DATABASE_FILE.to_string(),
        };

        Self {
            project_dir: PathBuf::from(var("CRM_PROJECT_DIR", ".")),
            venv_dir: PathBuf::from(var("CRM_VENV_DIR", DEFAULT_VENV_DIR)),
            host_python: var("CRM_HOST_PYTHON", DEFAULT_HOST_PYTHON),
            psql: var("CRM_PSQL", DEFAULT_PSQL),
            app_label: var("CRM_APP_LABEL", DEFAULT_APP_LABEL),
            settings_file: PathBuf::from(var("CRM_SETTINGS_FILE", DEFAULT_SETTINGS_FILE)),
            requirements_file: PathBuf::from(var(
                "CRM_REQUIREMENTS_FILE",
                DEFAULT_REQUIREMENTS_FILE,
            )),
            seed_command: var("CRM_SEED_COMMAND", DEFAULT_SEED_COMMAND),
            db_engine,
            db_name: var("DB_NAME", DEFAULT_DB_NAME),
            sqlite_file: PathBuf::from(sqlite_file),
            db_user: var("DB_USER", DEFAULT_DB_USER),
            db_password: var("DB_PASSWORD", DEFAULT_DB_PASSWORD),
            db_host: var("DB_HOST", DEFAULT_DB_HOST),
            db_port: lookup("DB_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_PORT),
        }
    }

    /// Replace the project root; relative paths follow it.
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Database password for the application role.
    pub fn db_password(&self) -> &str {
        &self.db_password
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Runtime directory.
    pub fn venv_path(&self) -> PathBuf {
        self.resolve(&self.venv_dir)
    }

    /// Interpreter inside the runtime.
    pub fn runtime_python(&self) -> PathBuf {
        let venv = self.venv_path();
        if cfg!(windows) {
            venv.join("Scripts").join("python.exe")
        } else {
            venv.join("bin").join("python")
        }
    }

    /// Runtime interpreter when bootstrapped, host interpreter otherwise.
    pub fn app_python(&self) -> String {
        let runtime = self.runtime_python();
        if runtime.exists() {
            runtime.display().to_string()
        } else {
            self.host_python.clone()
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.resolve(&self.settings_file)
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.resolve(&self.requirements_file)
    }

    /// Migrations directory of the app label.
    pub fn migrations_dir(&self) -> PathBuf {
        self.project_dir.join(&self.app_label).join("migrations")
    }

    /// Local SQLite database file.
    pub fn sqlite_path(&self) -> PathBuf {
        self.resolve(&self.sqlite_file)
    }

    /// Collected static output directory.
    pub fn static_root(&self) -> PathBuf {
        self.project_dir.join(STATIC_ROOT_DIR)
    }

    /// Static sources shipped with the app label.
    pub fn static_source_dir(&self) -> PathBuf {
        self.project_dir.join(&self.app_label).join("static")
    }

    /// Connection URL for the configured engine.
    pub fn database_url(&self) -> AppResult<String> {
        match self.db_engine {
            DbEngine::Postgres => {
                let mut url = url::Url::parse(&format!(
                    "postgres://{}:{}/{}",
                    self.db_host, self.db_port, self.db_name
                ))
                .map_err(|e| AppError::validation(format!("Invalid database URL: {}", e)))?;
                url.set_username(&self.db_user)
                    .and_then(|_| url.set_password(Some(&self.db_password)))
                    .map_err(|_| AppError::validation("Database URL cannot carry credentials"))?;
                Ok(url.to_string())
            }
            DbEngine::Sqlite => Ok(format!("sqlite://{}?mode=ro", self.sqlite_path().display())),
        }
    }
}
