//! OS notification backend built on `notify`
//!
//! Each directory is watched non-recursively; recursion is driven by the
//! builder and the registration handler so excluded subtrees are never
//! subscribed.

use crossbeam_channel::{self as channel, Receiver, Sender, TrySendError};
use notify::event::{ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::trace;

use super::WatchBackend;
use crate::error::{Result, WatchError};
use crate::{EventKind, WatchEvent};

/// Backend using the platform's recommended watcher (inotify, FSEvents, ...)
pub struct NotifyBackend {
    watcher: RecommendedWatcher,
    events: Receiver<WatchEvent>,
    errors: Receiver<WatchError>,
}

impl NotifyBackend {
    /// Create a subscription with room for `queue_capacity` undelivered events
    ///
    /// Events arriving while the queue is full end the session with
    /// [`WatchError::QueueOverflow`].
    pub fn new(queue_capacity: usize) -> Result<Self> {
        let capacity = queue_capacity.max(1);
        let (event_tx, events) = channel::bounded(capacity);
        let (error_tx, errors) = channel::unbounded();

        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            forward(res, &event_tx, &error_tx, capacity);
        })
        .map_err(WatchError::Backend)?;

        Ok(Self {
            watcher,
            events,
            errors,
        })
    }
}

impl WatchBackend for NotifyBackend {
    fn add_directory(&mut self, path: &Path) -> Result<()> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Register {
                path: path.to_path_buf(),
                source,
            })
    }

    fn events(&self) -> &Receiver<WatchEvent> {
        &self.events
    }

    fn errors(&self) -> &Receiver<WatchError> {
        &self.errors
    }
}

/// Runs on notify's thread: translate and enqueue without blocking it
fn forward(
    res: notify::Result<notify::Event>,
    event_tx: &Sender<WatchEvent>,
    error_tx: &Sender<WatchError>,
    capacity: usize,
) {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            let _ = error_tx.send(WatchError::Notify(err));
            return;
        }
    };

    if event.need_rescan() {
        let _ = error_tx.send(WatchError::Rescan);
        return;
    }

    for translated in translate(event) {
        match event_tx.try_send(translated) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let _ = error_tx.send(WatchError::QueueOverflow { capacity });
                return;
            }
            // Backend dropped, nobody is listening
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}

/// Flatten a notify event into one [`WatchEvent`] per path
///
/// Anything that makes a path appear (including the destination side of a
/// rename) is reported as [`EventKind::Create`] so that directories moved
/// into the tree get registered. Access events carry no change and are
/// dropped.
pub(crate) fn translate(event: notify::Event) -> Vec<WatchEvent> {
    use notify::EventKind as N;

    let kind = match event.kind {
        N::Access(_) => {
            trace!("Ignoring access event: {:?}", event.paths);
            return vec![];
        }
        N::Create(_) => EventKind::Create,
        N::Remove(_) => EventKind::Remove,
        N::Modify(ModifyKind::Name(RenameMode::From)) => EventKind::Rename,
        N::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            let mut out = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                out.push(WatchEvent::new(EventKind::Rename, from));
            }
            out.extend(paths.map(|to| WatchEvent::new(EventKind::Create, to)));
            return out;
        }
        N::Modify(ModifyKind::Name(_)) => EventKind::Create,
        N::Modify(_) | N::Any | N::Other => EventKind::Modify,
    };

    event
        .paths
        .into_iter()
        .map(|path| WatchEvent::new(kind, path))
        .collect()
}
