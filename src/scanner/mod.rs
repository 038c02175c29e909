//! Scanner module for directory traversal, alias detection, and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using jwalk
//! - Hardlink/alias coalescing via (device, inode) identity
//! - Partial and whole-file content digests with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`alias`]: Grouping of paths that resolve to the same underlying file
//! - [`hasher`]: Sampling strategies (corners, middle, sequential) and digests
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod alias;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;

pub use alias::{coalesce_bucket, AliasGroup, Candidate};
pub use hasher::{digest_file, digest_to_hex, Digest, Strategy, DIGEST_LEN, SENTINEL_DIGEST};
pub use walker::{MultiWalker, Walker};

/// Metadata for a discovered regular file.
///
/// Carries exactly what the duplicate pipeline needs: the path and the
/// byte size. Entries are created by the walker and are immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Path to the file as discovered during the walk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Errors that can occur during directory scanning.
///
/// These are per-entry errors: the walk itself never aborts on them.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between discovery and stat.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
