//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `provision` - Postgres role/database creation and migration
//! - `upgrade` - Local runtime, schema and static asset refresh
//! - `verify` - Database connectivity check

pub mod args;

pub use args::{Cli, Commands};
