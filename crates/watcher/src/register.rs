//! Registration of directories created while monitoring
//!
//! A new subdirectory produces a Create event in its (already watched)
//! parent. Registering it at that point is what keeps later changes inside it
//! visible. Everything that goes wrong here is logged and swallowed: losing
//! one late directory must not end the session.

use tracing::{debug, warn};

use crate::builder::register_tree;
use crate::exclude::ExclusionSet;
use crate::platform::WatchBackend;
use crate::{EventKind, WatchEvent};

/// What the handler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Not a creation
    Ignored,
    /// Created path is excluded
    Excluded,
    /// Created path is a file (or something else that is not a directory)
    NotADirectory,
    /// Created directory registered, along with this many directories found beneath it
    Registered { nested: usize },
    /// Created path could not be stat'ed (usually already gone)
    StatFailed,
    /// Backend refused the new directory
    RegisterFailed,
}

/// Register the directory behind a Create event
///
/// Directories that already contain subdirectories when they are noticed
/// (`mkdir -p`, or a tree moved into place) have those registered too, with
/// exclusions still pruned. Those nested registrations are best-effort.
/// A symlink to a directory is registered itself; its target is not walked.
pub fn register_created<B: WatchBackend + ?Sized>(
    backend: &mut B,
    exclusions: &ExclusionSet,
    event: &WatchEvent,
) -> Registration {
    if event.kind != EventKind::Create {
        return Registration::Ignored;
    }

    let path = event.path();
    if exclusions.contains(path) {
        debug!("Ignoring excluded path: {}", path.display());
        return Registration::Excluded;
    }

    let metadata = match event.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Failed to stat {}: {}", path.display(), e);
            return Registration::StatFailed;
        }
    };

    if !metadata.is_dir() {
        return Registration::NotADirectory;
    }

    if let Err(e) = backend.add_directory(path) {
        warn!("{}", e);
        return Registration::RegisterFailed;
    }
    debug!("Watching new directory {}", path.display());

    // A link is watched like the directory it points at, but never walked
    if event.is_symlink() {
        return Registration::Registered { nested: 0 };
    }

    let nested = match register_tree(backend, exclusions, path, 1) {
        Ok(count) => count,
        Err(e) => {
            warn!("Incomplete watch of {}: {}", path.display(), e);
            0
        }
    };

    Registration::Registered { nested }
}
