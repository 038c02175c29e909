//! dupescan - Duplicate File Finder
//!
//! Entry point for the dupescan CLI.

use anyhow::Result;
use clap::Parser;
use dupescan::{
    cli::Cli,
    duplicates::DuplicateFinder,
    error::ExitCode,
    logging,
    report::Reporter,
};
use std::io;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before any log calls.
    logging::init_logging(cli.verbose, cli.quiet);

    // Zero roots defaults to the current working directory.
    let requested: Vec<PathBuf> = if cli.roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.roots
    };

    // A root that does not exist or is not a directory is skipped; the
    // run only fails if nothing at all can be scanned.
    let mut roots = Vec::with_capacity(requested.len());
    for root in requested {
        if root.is_dir() {
            roots.push(root);
        } else {
            log::warn!("Skipping root (not a directory): {}", root.display());
        }
    }

    if roots.is_empty() {
        log::error!("No usable root to scan");
        std::process::exit(ExitCode::InternalError.as_i32());
    }

    log::debug!("Scanning {} root(s): {:?}", roots.len(), roots);

    let stdout = io::stdout().lock();
    let mut reporter = Reporter::new(stdout);

    let finder = DuplicateFinder::new();
    finder.run(&roots, &mut reporter)?;

    Ok(())
}
