//! Recursive watch registration
//!
//! Walks the watch root once, depth-first, registering every directory that
//! is not excluded. Excluded directories are pruned: the walk never descends
//! into them, so nothing beneath them is ever registered.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::exclude::ExclusionSet;
use crate::platform::{NotifyBackend, WatchBackend};
use crate::register::{register_created, Registration};
use crate::WatchEvent;

/// A backend subscribed to every non-excluded directory under `root`
pub struct RecursiveWatcher<B: WatchBackend> {
    /// Watched tree
    root: PathBuf,

    /// Paths never registered
    exclusions: ExclusionSet,

    /// Live subscription
    backend: B,

    /// Directories registered by the initial walk
    registered: usize,
}

impl<B: WatchBackend> RecursiveWatcher<B> {
    /// Register `root` and every directory under it
    ///
    /// Any walk or registration failure aborts construction. The backend is
    /// dropped on the way out, releasing whatever it had already subscribed.
    pub fn build(root: impl Into<PathBuf>, exclusions: ExclusionSet, mut backend: B) -> Result<Self> {
        let root = root.into();

        let registered = register_tree(&mut backend, &exclusions, &root, 0)?;

        info!(
            "Watching {} directories under {} ({} exclusions)",
            registered,
            root.display(),
            exclusions.len()
        );

        Ok(Self {
            root,
            exclusions,
            backend,
            registered,
        })
    }

    /// Feed one event through the dynamic registration handler
    pub fn handle(&mut self, event: &WatchEvent) -> Registration {
        register_created(&mut self.backend, &self.exclusions, event)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of directories registered at construction
    pub fn registered(&self) -> usize {
        self.registered
    }
}

impl RecursiveWatcher<NotifyBackend> {
    /// Build against the OS notification facility
    pub fn native(root: impl Into<PathBuf>, config: &MonitorConfig) -> Result<Self> {
        let root = root.into();
        let exclusions = ExclusionSet::from_config(&root, config);
        let backend = NotifyBackend::new(config.queue_capacity)?;
        Self::build(root, exclusions, backend)
    }
}

/// Register `dir` and the non-excluded directories beneath it
///
/// Entries shallower than `min_depth` are walked through but not registered.
/// Stops at the first error.
pub(crate) fn register_tree<B: WatchBackend + ?Sized>(
    backend: &mut B,
    exclusions: &ExclusionSet,
    dir: &Path,
    min_depth: usize,
) -> Result<usize> {
    let mut count = 0;

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .min_depth(min_depth)
        .into_iter()
        .filter_entry(|e| !exclusions.contains(e.path()));

    for entry in walker {
        let entry = entry?;

        if !entry.file_type().is_dir() {
            continue;
        }

        backend.add_directory(entry.path())?;
        debug!("Watching {}", entry.path().display());
        count += 1;
    }

    Ok(count)
}
