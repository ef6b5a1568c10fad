//! Monitor configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiescence delay before syncing
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Default number of events buffered while a sync is running
pub const DEFAULT_QUEUE_CAPACITY: usize = 16384;

/// Settings passed into the watcher and the debounce loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Paths to leave unwatched, relative to the watch root or absolute
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Quiet period required before syncing (zero disables coalescing)
    #[serde(rename = "delay_ms", with = "millis", default = "default_delay")]
    pub delay: Duration,

    /// Only consulted by the sync action
    #[serde(default)]
    pub dry_run: bool,

    /// Pending events allowed before the session fails with an overflow
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl MonitorConfig {
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Exclusion entries with blanks dropped
    pub fn exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclude
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            exclude: vec![],
            delay: DEFAULT_DELAY,
            dry_run: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

fn default_delay() -> Duration {
    DEFAULT_DELAY
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

mod millis {
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(delay.as_millis())
            .map_err(|_| <S::Error as ser::Error>::custom("delay does not fit in u64 milliseconds"))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
