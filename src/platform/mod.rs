//! Reference timestamps for files without a name-embedded date.
//!
//! The timestamp is platform-dependent: creation time on Windows,
//! last-modification time elsewhere.

#[cfg(target_os = "windows")]
pub mod windows;

use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Capability the host injects to date a file from its metadata.
pub trait TimestampSource {
    fn reference_timestamp(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Reads the timestamp from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformTimestamps;

impl TimestampSource for PlatformTimestamps {
    fn reference_timestamp(&self, path: &Path) -> io::Result<SystemTime> {
        let metadata = std::fs::metadata(path)?;
        reference_time(&metadata)
    }
}

#[cfg(target_os = "windows")]
pub fn reference_time(metadata: &Metadata) -> io::Result<SystemTime> {
    windows::reference_time(metadata)
}

#[cfg(not(target_os = "windows"))]
pub fn reference_time(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata.modified()
}
