use clap::{Args, Parser, Subcommand};
use mediro::{AppConfig, DateSource};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mediro")]
#[command(about = "Sort a pool of files into a YYYY/YYYY_MM/YYYY_MM_DD tree", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the files to sort
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Root of the dated directory tree
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Directory receiving files that could not be sorted
    #[arg(long, global = true)]
    pub unsorted: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sort every file in the input directory
    Sort(SortArgs),
    /// Create the input and unsorted directories
    Init,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Where file dates come from
    #[arg(long, value_enum)]
    pub date_source: Option<DateSource>,

    /// Ask before renaming a file that collides at its destination
    #[arg(long)]
    pub interactive: bool,

    /// Stop the whole sweep at the first declined rename
    #[arg(long)]
    pub abort_on_decline: bool,

    /// Start without the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    pub fn apply_paths(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_root = output.clone();
        }
        if let Some(unsorted) = &self.unsorted {
            config.unsorted_dir = unsorted.clone();
        }
    }
}

impl SortArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(source) = self.date_source {
            config.date_source = source;
        }
        config.interactive |= self.interactive;
        config.abort_on_decline |= self.abort_on_decline;
    }
}
