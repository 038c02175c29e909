//! Command-line interface definitions for dupescan.
//!
//! The CLI surface is deliberately small: a list of roots to scan plus
//! verbosity flags. Everything else (buffer sizes, stage order, worker
//! count) is fixed by the pipeline.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! dupescan
//!
//! # Scan two trees at once
//! dupescan ~/Pictures /mnt/backup/Pictures
//!
//! # Verbose mode: per-thread hashing diagnostics on stderr
//! dupescan -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find byte-identical files beneath one or more directory roots.
#[derive(Debug, Parser)]
#[command(name = "dupescan", version, about)]
pub struct Cli {
    /// Directories to scan. Defaults to the current directory.
    #[arg(value_name = "ROOT", value_hint = clap::ValueHint::DirPath)]
    pub roots: Vec<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output below error level.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
