//! Client-side assets shipped with the tool.
//!
//! The focus ring hook is installed into the app's static sources before
//! static collection, so `collectstatic` picks it up like any other file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;

/// Adds `focus-ring` to every `.btn-primary` on click and removes it on blur.
pub const FOCUS_RING_JS: &str = include_str!("focus_ring.js");

/// Selector the hook binds to.
pub const PRIMARY_ACTION_SELECTOR: &str = ".btn-primary";

/// Class toggled by the hook.
pub const FOCUS_RING_CLASS: &str = "focus-ring";

/// Location of the hook under a static source directory.
pub fn focus_ring_path(static_dir: &Path) -> PathBuf {
    static_dir.join("js").join("focus_ring.js")
}

/// Write the hook under `static_dir` unless an identical copy is present.
///
/// Returns `true` when the file was written.
pub fn install(static_dir: &Path) -> AppResult<bool> {
    let path = focus_ring_path(static_dir);

    if fs::read_to_string(&path).is_ok_and(|current| current == FOCUS_RING_JS) {
        tracing::debug!(path = %path.display(), "Focus ring asset up to date");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, FOCUS_RING_JS)?;
    tracing::info!(path = %path.display(), "Installed focus ring asset");

    Ok(true)
}
