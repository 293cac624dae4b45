//! Log output for the `pastis` binary.
//!
//! Everything goes to stderr so that command output on stdout stays clean.
//! A log file is appended to as well when one is configured.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::Result;

/// Map a level name to a tracing level. Unknown names mean info.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Open the log file for appending, creating its directory.
/// `Ok(None)` when no file is configured.
fn open_log_file(path: &str) -> Result<Option<File>> {
    if path.is_empty() {
        return Ok(None);
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(file))
}

fn install(level: &str, file: Option<File>) {
    let filter = EnvFilter::from_default_env().add_directive(parse_level(level).into());
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();
}

/// Install the global subscriber: stderr plus the configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = open_log_file(&config.file)?;
    install(&config.level, file);
    Ok(())
}

/// Install a stderr-only subscriber, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    install(level, None);
}
