use crate::classify::{Classifier, FileEntry, Outcome, UnsortedReason};
use crate::config::AppConfig;
use crate::confirm::{Confirm, NeverConfirm};
use crate::error::Error;
use crate::platform::{PlatformTimestamps, TimestampSource};
use crate::report::SweepReporter;
use chrono::{Local, NaiveDate};
use glob::Pattern;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

pub struct SortEngine {
    config: AppConfig,
    timestamps: Box<dyn TimestampSource>,
    confirm: Box<dyn Confirm>,
    today: Option<NaiveDate>,
}

/// A file that could not be moved. It stays where it was.
#[derive(Debug)]
pub struct SweepFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct SweepSummary {
    pub sorted: usize,
    pub unsorted: usize,
    /// Entries left in the pool because they matched an ignore pattern.
    pub skipped: usize,
    pub unsorted_by_reason: HashMap<UnsortedReason, usize>,
    pub failures: Vec<SweepFailure>,
    /// The sweep stopped early on a declined rename.
    pub aborted: bool,
    pub duration: Duration,
}

impl SweepSummary {
    pub fn unsorted_for(&self, reason: UnsortedReason) -> usize {
        self.unsorted_by_reason.get(&reason).copied().unwrap_or(0)
    }

    fn record_unsorted(&mut self, reason: UnsortedReason) {
        self.unsorted += 1;
        *self.unsorted_by_reason.entry(reason).or_default() += 1;
    }
}

impl SortEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            timestamps: Box::new(PlatformTimestamps),
            confirm: Box::new(NeverConfirm),
            today: None,
        }
    }

    pub fn with_timestamps(mut self, timestamps: impl TimestampSource + 'static) -> Self {
        self.timestamps = Box::new(timestamps);
        self
    }

    /// Decision used for collision renames when `interactive` is set.
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Pin the date used for future-date rejection. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Non-recursive listing of the input directory, sorted by name.
    pub fn snapshot(&self) -> Result<Vec<FileEntry>, Error> {
        let input = &self.config.input_dir;
        if !input.is_dir() {
            return Err(Error::InputDirMissing(input.clone()));
        }

        WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| -> Result<FileEntry, Error> {
                let entry = entry.map_err(|e| walk_error(input, e))?;
                let path = entry.path().to_path_buf();
                let is_dir = path.is_dir();
                Ok(FileEntry::from_os_name(
                    entry.file_name().to_os_string(),
                    is_dir,
                    path,
                ))
            })
            .collect()
    }

    fn ignore_patterns(&self) -> Result<Vec<Pattern>, Error> {
        self.config
            .ignore_patterns
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| Error::InvalidPattern {
                    pattern: glob.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Classify and move every entry of the pool, one at a time.
    pub fn sweep(&self, reporter: &dyn SweepReporter) -> Result<SweepSummary, Error> {
        let start = Instant::now();
        let ignore = self.ignore_patterns()?;

        info!("Reading {}...", self.config.input_dir.display());
        let entries = self.snapshot()?;
        reporter.on_sweep_start(entries.len());

        let unsorted_dir = &self.config.unsorted_dir;
        fs::create_dir_all(unsorted_dir).map_err(|e| Error::io(unsorted_dir, e))?;

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut classifier = Classifier::new(
            &self.config.output_root,
            self.config.date_source,
            &*self.timestamps,
        );
        if self.config.interactive {
            classifier = classifier.interactive(&*self.confirm);
        }

        info!("Sorting {} entries...", entries.len());
        let mut summary = SweepSummary::default();
        for entry in &entries {
            if ignore.iter().any(|p| p.matches(&entry.name)) {
                debug!("{}: ignored", entry.name);
                summary.skipped += 1;
                reporter.on_file_skipped(&entry.name);
                continue;
            }

            let outcome = match classifier.classify(entry, today) {
                Ok(outcome) => outcome,
                Err(err) => {
                    fail(&mut summary, reporter, entry, err);
                    continue;
                }
            };

            match outcome {
                Outcome::Sorted { path, .. } => match move_entry(&entry.source_path, &path) {
                    Ok(()) => {
                        summary.sorted += 1;
                        reporter.on_file_sorted(&entry.name, &path);
                    }
                    Err(err) => fail(&mut summary, reporter, entry, err),
                },
                Outcome::Unsorted(reason) => {
                    let target = unsorted_dir.join(&entry.file_name);
                    match move_entry(&entry.source_path, &target) {
                        Ok(()) => {
                            debug!("{}: unsorted ({})", entry.name, reason);
                            summary.record_unsorted(reason);
                            reporter.on_file_unsorted(&entry.name, reason);
                        }
                        Err(err) => {
                            fail(&mut summary, reporter, entry, err);
                            continue;
                        }
                    }

                    if reason == UnsortedReason::UserDeclinedRename && self.config.abort_on_decline
                    {
                        warn!("Rename declined for {}, stopping sweep", entry.name);
                        summary.aborted = true;
                        break;
                    }
                }
            }
        }

        summary.duration = start.elapsed();
        info!(
            "Sweep completed in {:.2}s: {} sorted, {} unsorted, {} skipped, {} failed",
            summary.duration.as_secs_f64(),
            summary.sorted,
            summary.unsorted,
            summary.skipped,
            summary.failures.len(),
        );
        reporter.on_sweep_complete(summary.sorted, summary.unsorted);

        Ok(summary)
    }
}

fn fail(summary: &mut SweepSummary, reporter: &dyn SweepReporter, entry: &FileEntry, err: Error) {
    error!("Error processing {}: {}", entry.source_path.display(), err);
    reporter.on_file_failed(&entry.name, &err);
    summary.failures.push(SweepFailure {
        path: entry.source_path.clone(),
        error: err,
    });
}

fn move_entry(from: &Path, to: &Path) -> Result<(), Error> {
    fs::rename(from, to).map_err(|e| Error::io(from, e))
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
    Error::Io { path, source }
}
