use crate::utils::{plural_s, prompt_confirm};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use mediro::{Confirm, SweepReporter, UnsortedReason};
use std::path::Path;

/// CLI sweep reporter: one progress bar over the pool snapshot, with
/// unsorted and failed files printed above it.
pub struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Terminal confirmation that pauses the bar while waiting for input.
    pub fn confirm(&self) -> TerminalConfirm {
        TerminalConfirm {
            bar: self.bar.clone(),
        }
    }
}

impl SweepReporter for CliReporter {
    fn on_sweep_start(&self, total_entries: usize) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total_entries as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Sorting [{bar:30.cyan/dim}] {pos}/{len} {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─"),
        );
    }

    fn on_file_sorted(&self, name: &str, _destination: &Path) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    fn on_file_unsorted(&self, name: &str, reason: UnsortedReason) {
        self.bar
            .println(format!("  {} {} ({})", "→".yellow(), name, reason));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, _name: &str) {
        self.bar.inc(1);
    }

    fn on_file_failed(&self, name: &str, error: &mediro::Error) {
        self.bar
            .println(format!("  {} {}: {}", "✗".red(), name, error));
        self.bar.inc(1);
    }

    fn on_sweep_complete(&self, sorted: usize, unsorted: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "  {} {} file{} sorted",
            "✓".green(),
            format!("{}", sorted).green(),
            plural_s(sorted)
        );
        eprintln!(
            "  {} {} file{} unsuccessfully sorted",
            "•".yellow(),
            format!("{}", unsorted).yellow(),
            plural_s(unsorted)
        );
    }
}

pub struct TerminalConfirm {
    bar: ProgressBar,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        // Closing the prompt (EOF, read error) declines like a "no"
        self.bar
            .suspend(|| prompt_confirm(prompt, Some(false)).unwrap_or(false))
    }
}
