use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config '{}': {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("failed to open log file '{}': {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
