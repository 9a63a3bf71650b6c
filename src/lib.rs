//! crm-ops - Operational tooling for the CRM web application
//!
//! Provisions the Postgres role and database the app connects with, and
//! keeps a local checkout's runtime, schema and static files current.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Environment-driven configuration and constants
//! - **domain**: Provisioning targets, SQL text and workflow reports
//! - **services**: The provisioning and upgrade workflows
//! - **infra**: Child processes, the admin catalog and database connections
//! - **assets**: Client-side scripts installed into the app
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Create role and database, then migrate
//! crm-ops provision --db-name crm_msui --db-user crm_user
//!
//! # Refresh the local environment
//! crm-ops upgrade --skip-seed
//!
//! # Check the configured database
//! crm-ops verify
//! ```

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{AdminConnection, ProvisionTarget};
pub use errors::{AppError, AppResult};
pub use services::{Provisioner, UpgradeOptions, Upgrader};
