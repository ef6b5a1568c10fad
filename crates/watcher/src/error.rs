//! Error types for the watcher

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that end a monitoring session
///
/// Per-event problems (a path vanishing before it can be stat'ed, one late
/// directory failing to register) never surface here; they are logged where
/// they happen.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Initial tree walk failed
    #[error("failed to walk watch root: {0}")]
    Walk(#[from] walkdir::Error),

    /// Adding a directory to the notification subscription failed
    #[error("failed to watch {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Could not create the notification subscription
    #[error("failed to create watcher: {0}")]
    Backend(#[source] notify::Error),

    /// Error reported asynchronously by the notification subsystem
    #[error("watch error: {0}")]
    Notify(#[source] notify::Error),

    /// Too many events queued while the loop was busy
    #[error("event queue overflow: more than {capacity} pending events")]
    QueueOverflow { capacity: usize },

    /// The OS dropped events and asked for a rescan
    #[error("kernel event queue overflowed, events were lost")]
    Rescan,

    /// The backend hung up
    #[error("notification stream closed")]
    StreamClosed,

    /// The synchronization action failed
    #[error("sync failed: {0}")]
    Sync(#[source] anyhow::Error),
}

impl WatchError {
    /// The sync action's own error, if this is a sync failure
    pub fn as_sync(&self) -> Option<&anyhow::Error> {
        match self {
            WatchError::Sync(err) => Some(err),
            _ => None,
        }
    }
}
