use std::fs::Metadata;
use std::io;
use std::time::SystemTime;

pub fn reference_time(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata.created()
}
