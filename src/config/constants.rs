//! Application-wide constants
//!
//! Centralized location for default names, paths and commands.

// =============================================================================
// Database
// =============================================================================

/// Engine selector understood by the app settings
pub const ENGINE_POSTGRES: &str = "postgresql";

/// SQLite fallback engine selector
pub const ENGINE_SQLITE: &str = "sqlite";

/// Default database engine
pub const DEFAULT_DB_ENGINE: &str = ENGINE_POSTGRES;

/// Default application database name
pub const DEFAULT_DB_NAME: &str = "crm_msui";

/// Default application user used by the app settings
pub const DEFAULT_DB_USER: &str = "postgres";

/// Default application password used by the app settings
pub const DEFAULT_DB_PASSWORD: &str = "postgres";

/// Default database host
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default database port
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Maintenance database the admin client connects to
pub const MAINTENANCE_DATABASE: &str = "postgres";

/// Local SQLite database file removed on hard reset
pub const SQLITE_DATABASE_FILE: &str = "db.sqlite3";

// =============================================================================
// Provisioning
// =============================================================================

/// Role created by the provisioner when none is given
pub const DEFAULT_PROVISION_USER: &str = "crm_user";

/// Password for the provisioned role when none is given
pub const DEFAULT_PROVISION_PASSWORD: &str = "crm_password";

/// Default superuser for administrative statements
pub const DEFAULT_ADMIN_USER: &str = "postgres";

/// Default superuser password
pub const DEFAULT_ADMIN_PASSWORD: &str = "postgres";

/// Administrative client executable
pub const DEFAULT_PSQL: &str = "psql";

/// Postgres driver installed into the runtime before migrating
pub const POSTGRES_DRIVER_PACKAGE: &str = "psycopg2-binary";

// =============================================================================
// Project layout
// =============================================================================

/// Isolated runtime directory, relative to the project root
pub const DEFAULT_VENV_DIR: &str = ".venv";

/// Interpreter used to create the runtime
#[cfg(windows)]
pub const DEFAULT_HOST_PYTHON: &str = "python";

/// Interpreter used to create the runtime
#[cfg(not(windows))]
pub const DEFAULT_HOST_PYTHON: &str = "python3";

/// Application label whose migrations are regenerated
pub const DEFAULT_APP_LABEL: &str = "crm_app";

/// Settings module patched with the static root declaration
pub const DEFAULT_SETTINGS_FILE: &str = "crm_project/settings.py";

/// Declared dependencies
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Management script at the project root
pub const MANAGE_SCRIPT: &str = "manage.py";

/// Demo data seeding command
pub const DEFAULT_SEED_COMMAND: &str = "seed_projects";

/// Migration file kept across hard resets
pub const MIGRATIONS_BOOTSTRAP_FILE: &str = "__init__.py";

/// Collected static output directory
pub const STATIC_ROOT_DIR: &str = "staticfiles";

/// Declaration appended to settings when no static root exists
pub const STATIC_ROOT_DECLARATION: &str = "STATIC_ROOT = BASE_DIR / \"staticfiles\"";

// =============================================================================
// Environment keys
// =============================================================================

pub const ENV_DB_ENGINE: &str = "DB_ENGINE";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";

/// Password variable read by the admin client
pub const ENV_PGPASSWORD: &str = "PGPASSWORD";
