//! The debounce loop
//!
//! ```text
//!            event                      timer expires
//!   Idle ───────────► Collecting ─────────────────────► Firing
//!    ▲                 │      ▲                            │
//!    │                 └──────┘ event: re-arm timer        │
//!    └──────────────────────────────────────────────────────┘
//!                         sync action returned Ok
//! ```
//!
//! Every event is passed through the registration handler before the timer
//! is touched. With a zero delay the loop goes straight from Idle to Firing.
//! A failing sync action, or any error from the backend, ends the loop.

use crossbeam_channel::select;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::builder::RecursiveWatcher;
use crate::config::MonitorConfig;
use crate::debounce::{DebounceState, DebounceTimer};
use crate::error::{Result, WatchError};
use crate::platform::WatchBackend;
use crate::WatchEvent;

/// The work done once a burst of changes has settled
///
/// Implemented for any `FnMut() -> anyhow::Result<()>`. The loop never calls
/// it concurrently with itself.
pub trait SyncAction {
    fn sync(&mut self) -> anyhow::Result<()>;
}

impl<F> SyncAction for F
where
    F: FnMut() -> anyhow::Result<()>,
{
    fn sync(&mut self) -> anyhow::Result<()> {
        self()
    }
}

/// Owns the watcher and the idle timer for the whole session
pub struct Monitor<B: WatchBackend> {
    watcher: RecursiveWatcher<B>,
    timer: DebounceTimer,
    state: DebounceState,
}

impl<B: WatchBackend> Monitor<B> {
    pub fn new(watcher: RecursiveWatcher<B>, delay: Duration) -> Self {
        Self {
            watcher,
            timer: DebounceTimer::new(delay),
            state: DebounceState::Idle,
        }
    }

    pub fn from_config(watcher: RecursiveWatcher<B>, config: &MonitorConfig) -> Self {
        Self::new(watcher, config.delay)
    }

    pub fn watcher(&self) -> &RecursiveWatcher<B> {
        &self.watcher
    }

    /// Consume events until something fatal happens
    ///
    /// Only returns on error: a backend failure, a closed event stream, or a
    /// failed sync (wrapped unchanged in [`WatchError::Sync`]).
    pub fn run<A: SyncAction>(mut self, mut action: A) -> Result<()> {
        let events = self.watcher.backend().events().clone();
        let errors = self.watcher.backend().errors().clone();
        let mut burst = 0usize;

        loop {
            let expiry = self.timer.expiry();

            let settled = select! {
                recv(events) -> msg => {
                    let event = msg.map_err(|_| WatchError::StreamClosed)?;
                    self.observe(&event);
                    burst += 1;

                    if self.timer.is_enabled() {
                        self.timer.arm();
                        self.state = DebounceState::Collecting;
                        false
                    } else {
                        true
                    }
                }
                recv(errors) -> msg => {
                    return Err(msg.unwrap_or(WatchError::StreamClosed));
                }
                recv(expiry) -> _ => true,
            };

            if !settled {
                continue;
            }

            self.timer.disarm();
            self.state = DebounceState::Firing;
            info!("{} change(s) settled, syncing", burst);

            action.sync().map_err(WatchError::Sync)?;

            burst = 0;
            self.state = DebounceState::Idle;
        }
    }

    fn observe(&mut self, event: &WatchEvent) {
        match self.state {
            DebounceState::Collecting => debug!("watcher (on timer): {}", event),
            _ => debug!("watcher: {}", event),
        }
        self.watcher.handle(event);
    }
}

/// Watch `root` with the OS backend and sync after every settled burst
///
/// Returns only on a fatal error, including failure to set up the watch.
pub fn monitor<A: SyncAction>(root: impl Into<PathBuf>, config: &MonitorConfig, action: A) -> Result<()> {
    let watcher = RecursiveWatcher::native(root, config)?;
    Monitor::from_config(watcher, config).run(action)
}
