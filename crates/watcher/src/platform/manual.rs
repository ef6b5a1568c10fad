//! In-memory backend for deterministic tests
//!
//! Nothing here touches the OS. Tests hold a [`ManualHandle`] to push events
//! and errors into the loop and to inspect which directories were
//! registered.

use crossbeam_channel::{self as channel, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::WatchBackend;
use crate::error::{Result, WatchError};
use crate::{EventKind, WatchEvent};

#[derive(Default)]
struct Registry {
    registered: Mutex<Vec<PathBuf>>,
    refused: Mutex<HashSet<PathBuf>>,
}

/// Scripted backend; see [`ManualHandle`] for the driving side
pub struct ManualBackend {
    events: Receiver<WatchEvent>,
    errors: Receiver<WatchError>,
    registry: Arc<Registry>,
}

impl ManualBackend {
    pub fn new() -> (Self, ManualHandle) {
        let (event_tx, events) = channel::unbounded();
        let (error_tx, errors) = channel::unbounded();
        let registry = Arc::new(Registry::default());

        let backend = Self {
            events,
            errors,
            registry: registry.clone(),
        };
        let handle = ManualHandle {
            events: event_tx,
            errors: error_tx,
            registry,
        };

        (backend, handle)
    }

    /// Directories registered so far, in order
    pub fn registered(&self) -> Vec<PathBuf> {
        self.registry.registered.lock().clone()
    }
}

impl WatchBackend for ManualBackend {
    fn add_directory(&mut self, path: &Path) -> Result<()> {
        if self.registry.refused.lock().contains(path) {
            return Err(WatchError::Register {
                path: path.to_path_buf(),
                source: notify::Error::generic("registration refused"),
            });
        }

        self.registry.registered.lock().push(path.to_path_buf());
        Ok(())
    }

    fn events(&self) -> &Receiver<WatchEvent> {
        &self.events
    }

    fn errors(&self) -> &Receiver<WatchError> {
        &self.errors
    }
}

/// Driving side of a [`ManualBackend`]
///
/// Dropping every handle closes the streams, which ends a running loop with
/// [`WatchError::StreamClosed`].
#[derive(Clone)]
pub struct ManualHandle {
    events: Sender<WatchEvent>,
    errors: Sender<WatchError>,
    registry: Arc<Registry>,
}

impl ManualHandle {
    /// Deliver an event; returns false once the backend is gone
    pub fn push(&self, event: WatchEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn create(&self, path: impl Into<PathBuf>) -> bool {
        self.push(WatchEvent::new(EventKind::Create, path))
    }

    pub fn modify(&self, path: impl Into<PathBuf>) -> bool {
        self.push(WatchEvent::new(EventKind::Modify, path))
    }

    pub fn remove(&self, path: impl Into<PathBuf>) -> bool {
        self.push(WatchEvent::new(EventKind::Remove, path))
    }

    /// Deliver an asynchronous subsystem error
    pub fn fail(&self, error: WatchError) -> bool {
        self.errors.send(error).is_ok()
    }

    /// Make future registrations of `path` fail
    pub fn refuse(&self, path: impl Into<PathBuf>) {
        self.registry.refused.lock().insert(path.into());
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.registry.registered.lock().clone()
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.registry.registered.lock().iter().any(|p| p == path)
    }

    /// Events queued but not yet consumed
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_is_recorded() {
        let (mut backend, handle) = ManualBackend::new();

        backend.add_directory(Path::new("/src")).unwrap();
        backend.add_directory(Path::new("/src/lib")).unwrap();

        assert_eq!(
            handle.registered(),
            vec![PathBuf::from("/src"), PathBuf::from("/src/lib")]
        );
        assert_eq!(backend.registered(), handle.registered());
    }

    #[test]
    fn test_refused_registration() {
        let (mut backend, handle) = ManualBackend::new();
        handle.refuse("/src/locked");

        assert!(backend.add_directory(Path::new("/src/locked")).is_err());
        assert!(!handle.is_registered(Path::new("/src/locked")));
    }

    #[test]
    fn test_events_flow_in_order() {
        let (backend, handle) = ManualBackend::new();

        handle.create("/src/a");
        handle.modify("/src/a");
        handle.remove("/src/a");
        assert_eq!(handle.pending(), 3);

        let kinds: Vec<_> = backend.events().try_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Create, EventKind::Modify, EventKind::Remove]
        );
    }

    #[test]
    fn test_push_after_backend_dropped() {
        let (backend, handle) = ManualBackend::new();
        drop(backend);

        assert!(!handle.modify("/src/a"));
        assert!(!handle.fail(WatchError::Rescan));
    }
}
