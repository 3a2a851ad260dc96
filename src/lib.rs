//! Sort a flat pool of files into a `YYYY/YYYY_MM/YYYY_MM_DD` tree.
//!
//! Each file is dated from an ISO 8601 date in its name or from its
//! filesystem timestamp. Files that cannot be dated, carry a future date,
//! or are directories go to a separate unsorted directory.

pub mod classify;
pub mod collision;
pub mod config;
pub mod confirm;
pub mod date;
pub mod engine;
pub mod error;
pub mod layout;
pub mod platform;
pub mod report;

pub use classify::{Classifier, FileEntry, Outcome, UnsortedReason};
pub use config::{AppConfig, DateSource};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use date::{DateKey, DateOrigin};
pub use engine::{SortEngine, SweepFailure, SweepSummary};
pub use error::Error;
pub use platform::{PlatformTimestamps, TimestampSource};
pub use report::{SilentReporter, SweepReporter};
