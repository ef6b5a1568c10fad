//! Terminal banners

use chrono::{DateTime, TimeZone};
use owo_colors::OwoColorize;
use std::path::Path;
use watcher::MonitorConfig;

/// Startup header: what is being synced where
pub fn header(source: &Path, remote: &str, config: &MonitorConfig) -> String {
    let mut lines = vec![
        format!("Source Directory:   {}", source.display()),
        format!("Remote Directory:   {}", remote),
    ];

    let excludes: Vec<&str> = config.exclusions().collect();
    if !excludes.is_empty() {
        lines.push("Exclude paths:".to_string());
        lines.extend(excludes.iter().map(|p| format!("    {}", p)));
    }
    if config.dry_run {
        lines.push("Dry run:            yes".to_string());
    }

    boxed(&lines)
}

/// Highlighted line printed right before each rsync
pub fn sync_banner<Tz: TimeZone>(at: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let text = format!("  rsync @ {}  ", at.format("%Y-%m-%d %H:%M:%S%.3f"));
    format!("\n{}\n", text.bold().white().on_purple())
}

fn boxed(lines: &[String]) -> String {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 6;
    let rule = "─".repeat(width);

    let mut out = format!("{}\n", format!("┌{}┐", rule).purple());
    for line in lines {
        let pad = width - 6 - line.chars().count();
        out.push_str(&format!(
            "{}   {}{}   {}\n",
            "│".purple(),
            line.bold(),
            " ".repeat(pad),
            "│".purple()
        ));
    }
    out.push_str(&format!("{}", format!("└{}┘", rule).purple()));
    out
}
