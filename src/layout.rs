use crate::date::DateKey;
use crate::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// `<root>/YYYY/YYYY_MM/YYYY_MM_DD` for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPath(PathBuf);

impl DestinationPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for DestinationPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

pub fn compose(root: &Path, date: &DateKey) -> DestinationPath {
    DestinationPath(
        root.join(date.year_dir())
            .join(date.month_dir())
            .join(date.day_dir()),
    )
}

/// Create every missing segment of `dest`. No-op when it already exists.
pub fn ensure_exists(dest: &DestinationPath) -> Result<(), Error> {
    let path = dest.as_path();
    if path.is_dir() {
        return Ok(());
    }
    trace!("Creating {}", path.display());
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
