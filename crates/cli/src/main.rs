//! monitored-rsync CLI - mrsync command

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli_lib::config::{self, Overrides};
use cli_lib::rsync::Rsync;
use cli_lib::{banner, util};

const LONG_ABOUT: &str = "\
Monitors a directory for changes and, once a burst of changes has settled, \
mirrors it with rsync.

Use -v to see file change events and the rsync command line, -vv for \
everything. RUST_LOG overrides both.";

/// Mirror a directory with rsync whenever it changes
#[derive(Parser)]
#[command(name = "mrsync")]
#[command(author, version, about, long_about = LONG_ABOUT)]
struct Cli {
    /// Directory to monitor and rsync from
    source: String,

    /// rsync destination (passed to rsync as-is)
    remote: String,

    /// Comma-separated subdirectories of SOURCE to exclude from monitoring and rsync
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Milliseconds without changes to wait before running rsync (default: 1000, 0 = no wait)
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Run rsync with --dry-run
    #[arg(long)]
    dry_run: bool,

    /// Config file (default: <config dir>/monitored-rsync/config.toml, if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = util::absolute_source_dir(&cli.source)?;
    let file_config = config::load(cli.config.as_deref())?;
    let config = config::resolve(
        file_config,
        Overrides {
            exclude: cli.exclude,
            delay_ms: cli.delay,
            dry_run: cli.dry_run,
        },
    );

    println!("{}", banner::header(&source, &cli.remote, &config));

    let rsync = Rsync::from_config(&source, &cli.remote, &config);
    let session = tokio::task::spawn_blocking(move || {
        watcher::monitor(source, &config, move || -> Result<()> {
            println!("{}", banner::sync_banner(chrono::Local::now()));
            rsync.run()?;
            Ok(())
        })
    });

    tokio::select! {
        res = session => {
            res.context("Monitor thread panicked")??;
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, exiting");
            // The blocking monitor thread cannot be joined; leave without waiting
            std::process::exit(130);
        }
    }
}
