use crate::classify::UnsortedReason;
use std::path::Path;

/// Trait for reporting sweep progress.
///
/// The CLI implements this with indicatif and colored output.
/// All methods have default no-op implementations.
pub trait SweepReporter {
    fn on_sweep_start(&self, _total_entries: usize) {}
    fn on_file_sorted(&self, _name: &str, _destination: &Path) {}
    fn on_file_unsorted(&self, _name: &str, _reason: UnsortedReason) {}
    fn on_file_skipped(&self, _name: &str) {}
    fn on_file_failed(&self, _name: &str, _error: &crate::Error) {}
    fn on_sweep_complete(&self, _sorted: usize, _unsorted: usize) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl SweepReporter for SilentReporter {}
