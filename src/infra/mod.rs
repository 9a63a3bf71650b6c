//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Child processes (admin client, app runtime, management script)
//! - The Postgres catalog, reached through the admin client
//! - Direct database connections for verification

pub mod catalog;
pub mod db;
pub mod process;

pub use catalog::{AdminCatalog, PsqlCatalog};
pub use db::Database;
pub use process::{run_checked, CommandOutput, CommandRunner, CommandSpec, SystemRunner};

#[cfg(any(test, feature = "test-utils"))]
pub use catalog::MockAdminCatalog;
#[cfg(any(test, feature = "test-utils"))]
pub use process::MockCommandRunner;
