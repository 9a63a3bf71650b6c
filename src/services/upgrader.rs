//! Local environment upgrade workflow.
//!
//! Steps run in a fixed order and abort on the first failure, except the
//! demo seed which only logs a warning.

use std::fs;
use std::sync::Arc;

use super::workspace::{hard_reset, patch_settings};
use crate::assets;
use crate::config::{Config, MANAGE_SCRIPT};
use crate::domain::{SeedOutcome, UpgradeReport};
use crate::errors::AppResult;
use crate::infra::{run_checked, CommandRunner, CommandSpec};

/// Flags accepted by the upgrade workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeOptions {
    pub skip_seed: bool,
    pub hard_reset: bool,
}

/// Upgrade service
pub struct Upgrader {
    runner: Arc<dyn CommandRunner>,
    config: Config,
}

impl Upgrader {
    pub fn new(runner: Arc<dyn CommandRunner>, config: Config) -> Self {
        Self { runner, config }
    }

    pub async fn run(&self, options: UpgradeOptions) -> AppResult<UpgradeReport> {
        let reset = if options.hard_reset {
            tracing::warn!("Hard reset requested; local database and migrations will be deleted");
            let summary = hard_reset(&self.config)?;
            tracing::info!(
                database_removed = summary.database_removed,
                migrations_removed = summary.migrations_removed,
                "Hard reset finished"
            );
            Some(summary)
        } else {
            None
        };

        let runtime_created = self.ensure_runtime().await?;
        let dependencies_installed = self.install_dependencies().await?;
        let settings_patched = patch_settings(&self.config.settings_path())?;
        let asset_installed = assets::install(&self.config.static_source_dir())?;

        self.regenerate_migrations().await?;
        self.collect_static().await?;

        let seed = if options.skip_seed {
            tracing::info!("Skipping demo data");
            SeedOutcome::Skipped
        } else {
            self.seed().await
        };

        Ok(UpgradeReport {
            reset,
            runtime_created,
            dependencies_installed,
            settings_patched,
            asset_installed,
            seed,
        })
    }

    /// Create the runtime unless its interpreter already exists.
    async fn ensure_runtime(&self) -> AppResult<bool> {
        if self.config.runtime_python().exists() {
            tracing::debug!(venv = %self.config.venv_path().display(), "Runtime present");
            return Ok(false);
        }

        tracing::info!(venv = %self.config.venv_path().display(), "Creating runtime");
        let spec = CommandSpec::new(self.config.host_python.as_str())
            .args(["-m", "venv"])
            .arg(self.config.venv_path().display().to_string())
            .current_dir(&self.config.project_dir);
        run_checked(self.runner.as_ref(), &spec).await?;

        Ok(true)
    }

    async fn install_dependencies(&self) -> AppResult<bool> {
        tracing::info!("Upgrading package installer");
        self.python(["-m", "pip", "install", "--upgrade", "pip"])
            .await?;

        let requirements = self.config.requirements_path();
        if !requirements.exists() {
            tracing::warn!(
                path = %requirements.display(),
                "Requirements file not found; skipping dependency install"
            );
            return Ok(false);
        }

        tracing::info!(path = %requirements.display(), "Installing dependencies");
        self.python([
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            "-r".to_string(),
            requirements.display().to_string(),
        ])
        .await?;

        Ok(true)
    }

    async fn regenerate_migrations(&self) -> AppResult<()> {
        tracing::info!(app = %self.config.app_label, "Generating migrations");
        self.manage(["makemigrations", self.config.app_label.as_str()])
            .await?;

        tracing::info!("Applying migrations");
        self.manage(["migrate", "--noinput"]).await?;
        Ok(())
    }

    async fn collect_static(&self) -> AppResult<()> {
        let static_root = self.config.static_root();
        fs::create_dir_all(&static_root)?;

        tracing::info!(dir = %static_root.display(), "Collecting static files");
        self.manage(["collectstatic", "--noinput"]).await?;
        Ok(())
    }

    /// Best-effort: failures are logged and reported, never propagated.
    async fn seed(&self) -> SeedOutcome {
        tracing::info!(command = %self.config.seed_command, "Seeding demo data");

        match self.manage([self.config.seed_command.as_str()]).await {
            Ok(()) => SeedOutcome::Seeded,
            Err(e) => {
                tracing::warn!(error = %e, "Demo data seeding failed; continuing");
                SeedOutcome::Failed(e.to_string())
            }
        }
    }

    async fn manage<I, S>(&self, args: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = std::iter::once(MANAGE_SCRIPT.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect();
        self.python(args).await
    }

    async fn python<I, S>(&self, args: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new(self.config.app_python())
            .args(args)
            .current_dir(&self.config.project_dir);
        run_checked(self.runner.as_ref(), &spec).await?;
        Ok(())
    }
}
