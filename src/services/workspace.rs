//! Filesystem steps of the upgrade: hard reset and settings patch.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{Config, MIGRATIONS_BOOTSTRAP_FILE, STATIC_ROOT_DECLARATION};
use crate::domain::ResetSummary;
use crate::errors::AppResult;

/// Matches an existing `STATIC_ROOT = ...` assignment at line start,
/// with or without a type annotation.
static STATIC_ROOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*STATIC_ROOT\s*(?::[^=\n]*)?=").expect("static root pattern is valid")
});

/// Delete the local SQLite file and every migration except the bootstrap file.
///
/// Missing files and directories are not an error.
pub fn hard_reset(config: &Config) -> AppResult<ResetSummary> {
    let mut summary = ResetSummary::default();

    let db_path = config.sqlite_path();
    match fs::remove_file(&db_path) {
        Ok(()) => {
            tracing::warn!(path = %db_path.display(), "Removed local database");
            summary.database_removed = true;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let migrations = config.migrations_dir();
    let entries = match fs::read_dir(&migrations) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(summary),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        if entry.file_name() == MIGRATIONS_BOOTSTRAP_FILE {
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        tracing::debug!(path = %path.display(), "Removed migration entry");
        summary.migrations_removed += 1;
    }

    tracing::warn!(
        count = summary.migrations_removed,
        dir = %migrations.display(),
        "Removed migration files"
    );

    Ok(summary)
}

/// Whether the settings text already declares a static root.
pub fn declares_static_root(settings: &str) -> bool {
    STATIC_ROOT_RE.is_match(settings)
}

/// Append the default static root declaration when none is present.
///
/// Returns `true` when the file was changed.
pub fn patch_settings(path: &Path) -> AppResult<bool> {
    let mut content = fs::read_to_string(path)?;

    if declares_static_root(&content) {
        tracing::debug!(path = %path.display(), "STATIC_ROOT already declared");
        return Ok(false);
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(STATIC_ROOT_DECLARATION);
    content.push('\n');

    fs::write(path, content)?;
    tracing::info!(path = %path.display(), "Appended STATIC_ROOT to settings");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_detected_with_spacing() {
        assert!(declares_static_root("X = 1\nSTATIC_ROOT = BASE_DIR / 'out'\n"));
        assert!(declares_static_root("  STATIC_ROOT=BASE_DIR\n"));
    }

    #[test]
    fn test_annotated_declaration_detected() {
        assert!(declares_static_root("STATIC_ROOT: Path = BASE_DIR / \"x\"\n"));
        assert!(declares_static_root("STATIC_ROOT : str='/srv/static'\n"));
        assert!(!declares_static_root("STATIC_ROOT: Path\nOTHER = 1\n"));
    }

    #[test]
    fn test_patch_leaves_annotated_declaration_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.py");
        let original = "STATIC_URL = '/static/'\nSTATIC_ROOT: Path = BASE_DIR / \"x\"\n";
        fs::write(&path, original).unwrap();

        assert!(!patch_settings(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_mentions_are_not_declarations() {
        assert!(!declares_static_root("# set STATIC_ROOT later\n"));
        assert!(!declares_static_root("STATIC_ROOT_URL = '/x/'\n"));
        assert!(!declares_static_root("STATIC_URL = '/static/'\n"));
    }

    #[test]
    fn test_patch_appends_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.py");
        fs::write(&path, "STATIC_URL = '/static/'").unwrap();

        assert!(patch_settings(&path).unwrap());
        assert!(!patch_settings(&path).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("STATIC_ROOT").count(), 1);
        assert!(content.starts_with("STATIC_URL = '/static/'\nSTATIC_ROOT"));
    }

    #[test]
    fn test_patch_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(patch_settings(&dir.path().join("absent.py")).is_err());
    }
}
