//! monitored-rsync CLI library
//!
//! Everything around the watcher that makes up the `mrsync` binary: argument
//! resolution, configuration, the rsync sync action and terminal output.

pub mod banner;
pub mod config;
pub mod rsync;
pub mod util;
