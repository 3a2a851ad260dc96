use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Input directory {} not found", .0.display())]
    InputDirMissing(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::InputDirMissing(path) => Some(path),
            _ => None,
        }
    }
}
