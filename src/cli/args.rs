//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER, DEFAULT_DB_HOST, DEFAULT_DB_NAME,
    DEFAULT_PROVISION_PASSWORD, DEFAULT_PROVISION_USER,
};

/// CRM operations - provision the database and upgrade the local environment
#[derive(Parser, Debug)]
#[command(name = "crm-ops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root containing manage.py
    #[arg(short = 'C', long, global = true, env = "CRM_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database role and database, then migrate
    Provision(ProvisionArgs),

    /// Bring the local runtime, schema and static files up to date
    Upgrade(UpgradeArgs),

    /// Connect to the configured database and print its details
    Verify,
}

/// Arguments for the provision command
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Database to create
    #[arg(long, default_value = DEFAULT_DB_NAME, env = "DB_NAME")]
    pub db_name: String,

    /// Role the application connects as
    #[arg(long, default_value = DEFAULT_PROVISION_USER, env = "DB_USER")]
    pub db_user: String,

    /// Password for the application role
    #[arg(long, default_value = DEFAULT_PROVISION_PASSWORD, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Database server host
    #[arg(short = 'H', long, default_value = DEFAULT_DB_HOST, env = "DB_HOST")]
    pub host: String,

    /// Database server port
    #[arg(short, long, default_value = "5432", env = "DB_PORT")]
    pub port: u16,

    /// Superuser for administrative statements
    #[arg(long, default_value = DEFAULT_ADMIN_USER, env = "PG_ADMIN_USER")]
    pub admin_user: String,

    /// Superuser password
    #[arg(long, default_value = DEFAULT_ADMIN_PASSWORD, env = "PG_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Do not load demo data
    #[arg(long)]
    pub skip_seed: bool,

    /// Delete the local database and regenerate every migration
    #[arg(long)]
    pub hard_reset: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upgrade_flags_parse() {
        let cli = Cli::try_parse_from(["crm-ops", "upgrade", "--skip-seed", "--hard-reset"]).unwrap();
        match cli.command {
            Commands::Upgrade(args) => {
                assert!(args.skip_seed);
                assert!(args.hard_reset);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_provision_overrides_parse() {
        let cli = Cli::try_parse_from([
            "crm-ops",
            "provision",
            "--db-name",
            "crm_test",
            "--port",
            "6543",
            "--admin-user",
            "root",
        ])
        .unwrap();
        match cli.command {
            Commands::Provision(args) => {
                assert_eq!(args.db_name, "crm_test");
                assert_eq!(args.port, 6543);
                assert_eq!(args.admin_user, "root");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
