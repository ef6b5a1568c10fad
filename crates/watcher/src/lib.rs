//! File system watching for monitored-rsync
//!
//! This crate provides the change-detection engine behind `mrsync`:
//! - Recursive directory registration with excluded subtrees pruned
//! - Registration of directories created while monitoring
//! - Burst coalescing with a resettable idle timer
//! - A backend trait so the loop can run against a fake in tests

pub mod builder;
pub mod config;
pub mod debounce;
pub mod error;
pub mod exclude;
pub mod monitor;
pub mod platform;
pub mod register;

pub use builder::RecursiveWatcher;
pub use config::MonitorConfig;
pub use debounce::{DebounceState, DebounceTimer};
pub use error::{Result, WatchError};
pub use exclude::ExclusionSet;
pub use monitor::{monitor, Monitor, SyncAction};
pub use platform::{ManualBackend, ManualHandle, NotifyBackend, WatchBackend};
pub use register::{register_created, Registration};

use std::path::{Path, PathBuf};

/// File system event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

impl WatchEvent {
    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stat the affected path
    ///
    /// Events are hints: the path may already be gone by the time this runs.
    pub fn metadata(&self) -> std::io::Result<std::fs::Metadata> {
        std::fs::metadata(&self.path)
    }

    /// Whether the path itself is a symbolic link
    pub fn is_symlink(&self) -> bool {
        std::fs::symlink_metadata(&self.path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }
}

impl std::fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.kind, self.path.display())
    }
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Path appeared (created, or moved into a watched directory)
    Create,
    /// Contents or metadata changed
    Modify,
    /// Path deleted
    Remove,
    /// Path moved away
    Rename,
}
