//! Notification backends
//!
//! The debounce loop only needs three things from the OS: a way to add one
//! directory to the subscription, a stream of events, and a stream of
//! asynchronous errors. [`NotifyBackend`] provides them on top of `notify`;
//! [`ManualBackend`] provides them in memory so tests can script event
//! sequences and timing.

pub mod manual;
pub mod native;

pub use manual::{ManualBackend, ManualHandle};
pub use native::NotifyBackend;

use crossbeam_channel::Receiver;
use std::path::Path;

use crate::error::Result;
use crate::WatchEvent;

/// A live notification subscription over a growing set of directories
///
/// Directories are only ever added. Dropping the backend releases the
/// subscription.
pub trait WatchBackend {
    /// Start receiving events for entries directly inside `path`
    fn add_directory(&mut self, path: &Path) -> Result<()>;

    /// Change events, in delivery order
    fn events(&self) -> &Receiver<WatchEvent>;

    /// Errors raised by the notification subsystem
    fn errors(&self) -> &Receiver<crate::WatchError>;
}
