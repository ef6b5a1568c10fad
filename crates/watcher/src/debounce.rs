//! Burst debouncing
//!
//! One idle timer per monitor. Every event during a burst throws the pending
//! timer away and arms a new one for the full delay, so the sync fires only
//! after `delay` of silence, counted from the last event.

use crossbeam_channel::{self as channel, Receiver};
use std::time::{Duration, Instant};

/// Where the debounce loop is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Waiting for the first event of a burst
    Idle,
    /// Timer armed, absorbing events
    Collecting,
    /// Sync action running
    Firing,
}

/// Resettable idle timer
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    armed: Option<Receiver<Instant>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, armed: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// A zero delay means every event fires immediately
    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Replace any pending timer with one expiring `delay` from now
    pub fn arm(&mut self) {
        self.armed = Some(channel::after(self.delay));
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Channel to select on
    ///
    /// Yields once when the armed timer expires; never yields while disarmed.
    pub fn expiry(&self) -> Receiver<Instant> {
        self.armed.clone().unwrap_or_else(channel::never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_disarmed_never_fires() {
        let timer = DebounceTimer::new(Duration::from_millis(10));

        assert!(!timer.is_armed());
        assert!(timer
            .expiry()
            .recv_timeout(Duration::from_millis(50))
            .is_err());
    }

    #[test]
    fn test_armed_fires_after_delay() {
        let mut timer = DebounceTimer::new(Duration::from_millis(30));
        let start = Instant::now();
        timer.arm();

        timer.expiry().recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_rearm_restarts_full_delay() {
        let delay = Duration::from_millis(100);
        let mut timer = DebounceTimer::new(delay);
        timer.arm();

        sleep(Duration::from_millis(60));
        let rearmed_at = Instant::now();
        timer.arm();

        // The first deadline (40ms away) must not fire
        timer.expiry().recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(rearmed_at.elapsed() >= delay);
    }

    #[test]
    fn test_disarm_cancels() {
        let mut timer = DebounceTimer::new(Duration::from_millis(10));
        timer.arm();
        timer.disarm();

        assert!(timer
            .expiry()
            .recv_timeout(Duration::from_millis(50))
            .is_err());
    }

    #[test]
    fn test_zero_delay_is_disabled() {
        assert!(!DebounceTimer::new(Duration::ZERO).is_enabled());
        assert!(DebounceTimer::new(Duration::from_millis(1)).is_enabled());
    }
}
