use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Sends `tracing` output to `path`. The terminal is in raw mode on the
/// alternate screen while the widget runs, so logs never go to stdout/stderr.
pub fn init_file(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
