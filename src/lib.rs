//! dupescan - Duplicate File Finder
//!
//! A CLI tool that identifies byte-identical regular files beneath one or
//! more directory roots. Candidates are narrowed progressively: size
//! equality first, then partial content fingerprints (file corners, file
//! middle), and finally a whole-file BLAKE3 digest, so that only small,
//! already-correlated sets of files are ever read in full.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;
