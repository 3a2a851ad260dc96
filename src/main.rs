mod cli;
mod logging;
mod progress;
mod utils;

use std::fs;
use std::process;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use mediro::{AppConfig, SortEngine};
use progress::CliReporter;
use tracing::{error, info, warn};
use utils::{plural_s, prompt_confirm};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = match mediro::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    args.apply_paths(&mut config);

    match args.command {
        Some(Commands::Sort(sort)) => {
            sort.apply(&mut config);
            match run_sort(config, sort.yes) {
                Ok(true) => {}
                Ok(false) => process::exit(1),
                Err(err) => {
                    error!("Error: {}", err);
                    process::exit(1);
                }
            }
        }
        Some(Commands::Init) => {
            if let Err(err) = run_init(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }
}

/// Returns `Ok(false)` when some files could not be moved.
fn run_sort(config: AppConfig, skip_confirmation: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let engine = SortEngine::new(config);

    let entries = match engine.snapshot() {
        Ok(entries) => entries,
        Err(mediro::Error::InputDirMissing(dir)) => {
            let create = prompt_confirm(
                &format!("Input directory \"{}\" not found. Create it?", dir.display()),
                Some(false),
            )?;
            if create {
                fs::create_dir_all(&dir)?;
                info!("Created \"{}\". Add files to it and run again.", dir.display());
            }
            return Ok(true);
        }
        Err(err) => return Err(err.into()),
    };

    if !skip_confirmation {
        let count = entries.len();
        let start = prompt_confirm(
            &format!("{} file{} detected. Begin sort?", count, plural_s(count)),
            Some(false),
        )?;
        if !start {
            info!("Nothing moved.");
            return Ok(true);
        }
    }

    let reporter = CliReporter::new();
    let engine = engine.with_confirm(reporter.confirm());
    let summary = engine.sweep(&reporter)?;

    if summary.aborted {
        warn!("Sweep stopped after a declined rename; remaining files are still in the input directory");
    }
    if summary.skipped > 0 {
        info!(
            "{} file{} matched an ignore pattern and stayed in place",
            summary.skipped,
            plural_s(summary.skipped)
        );
    }
    for failure in &summary.failures {
        error!(
            "{} {}: {}",
            "Not moved".red(),
            failure.path.display(),
            failure.error
        );
    }

    Ok(summary.failures.is_empty())
}

fn run_init(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    for dir in [&config.input_dir, &config.unsorted_dir] {
        if dir.is_dir() {
            info!("{} already exists", dir.display());
        } else {
            fs::create_dir_all(dir)?;
            info!("Created {}", dir.display());
        }
    }
    Ok(())
}
