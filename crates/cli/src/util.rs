//! Shared utilities for the CLI

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Replace a leading `~` with the user's home directory
///
/// Paths not starting with `~` are returned unchanged.
pub fn expand_tilde(dir: &str, home: Option<&Path>) -> Result<PathBuf> {
    let Some(rest) = dir.strip_prefix('~') else {
        return Ok(PathBuf::from(dir));
    };

    let home = home.context("Failed to determine home directory")?;
    Ok(home.join(rest.trim_start_matches('/')))
}

/// Resolve the source directory argument to an absolute path
///
/// Handles `~`, `.`, `./sub` and plain relative paths. The result is cleaned
/// lexically but not canonicalized, so symlinks in the path are kept.
pub fn absolute_source_dir(dir: &str) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    resolve_source_dir(dir, &cwd, dirs::home_dir().as_deref())
}

pub fn resolve_source_dir(dir: &str, cwd: &Path, home: Option<&Path>) -> Result<PathBuf> {
    if dir.is_empty() {
        anyhow::bail!("Source directory must not be empty");
    }

    let expanded = expand_tilde(dir, home)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}
