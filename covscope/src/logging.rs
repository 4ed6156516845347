//! Tracing setup. The TUI owns the terminal, so logs go to a file.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "COVSCOPE_LOG";

/// Installs a non-ANSI fmt layer appending to `path`, filtered by
/// `COVSCOPE_LOG` (default `info`).
pub fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;
    Ok(())
}
