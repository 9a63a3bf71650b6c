//! Provisioning inputs.

use std::fmt;

use crate::config::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER, DEFAULT_DB_HOST, DEFAULT_DB_NAME,
    DEFAULT_DB_PORT, DEFAULT_PROVISION_PASSWORD, DEFAULT_PROVISION_USER, ENGINE_POSTGRES,
    ENV_DB_ENGINE, ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_PORT, ENV_DB_USER,
};

/// Role and database the application connects with.
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisionTarget {
    pub role: String,
    password: String,
    pub database: String,
}

impl ProvisionTarget {
    pub fn new(
        role: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for ProvisionTarget {
    fn default() -> Self {
        Self::new(DEFAULT_PROVISION_USER, DEFAULT_PROVISION_PASSWORD, DEFAULT_DB_NAME)
    }
}

impl fmt::Debug for ProvisionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionTarget")
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .finish()
    }
}

/// Server address plus superuser credentials for administrative statements.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminConnection {
    pub host: String,
    pub port: u16,
    pub user: String,
    password: String,
}

impl AdminConnection {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Connection variables the app's migration step reads for `target`.
    pub fn migration_env(&self, target: &ProvisionTarget) -> Vec<(String, String)> {
        vec![
            (ENV_DB_ENGINE.to_string(), ENGINE_POSTGRES.to_string()),
            (ENV_DB_NAME.to_string(), target.database.clone()),
            (ENV_DB_USER.to_string(), target.role.clone()),
            (ENV_DB_PASSWORD.to_string(), target.password.clone()),
            (ENV_DB_HOST.to_string(), self.host.clone()),
            (ENV_DB_PORT.to_string(), self.port.to_string()),
        ]
    }
}

impl Default for AdminConnection {
    fn default() -> Self {
        Self::new(
            DEFAULT_DB_HOST,
            DEFAULT_DB_PORT,
            DEFAULT_ADMIN_USER,
            DEFAULT_ADMIN_PASSWORD,
        )
    }
}

impl fmt::Debug for AdminConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConnection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
