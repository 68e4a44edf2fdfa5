// File: ./src/logging.rs
//! File logging. The terminal belongs to the UI, so records go to
//! `worddb.log` in the data directory.
use crate::context::AppContext;
use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Installs the process-wide logger. Returns the log file path.
///
/// Fails if a logger is already installed.
pub fn init(ctx: &dyn AppContext, level: LevelFilter) -> Result<PathBuf> {
    let path = ctx.get_log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("worddb")
        .build();

    WriteLogger::init(level, config, file)
        .map_err(|e| anyhow::anyhow!("Logger already initialized: {}", e))?;
    log::info!("worddb v{} logging to {:?}", env!("CARGO_PKG_VERSION"), path);
    Ok(path)
}

/// Routes panics into the log before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC: {}", info);
        default_hook(info);
    }));
}
