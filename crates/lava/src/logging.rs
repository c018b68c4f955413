//! File logging. The terminal belongs to the UI, so log lines go to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LAVA_LOG=debug`.
pub const LOG_ENV: &str = "LAVA_LOG";

const LOG_FILE: &str = "lava.log";

/// Install the global subscriber writing to `dir/lava.log`.
pub fn init(dir: &Path) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))?;

    Ok(path)
}
