//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting `(path, size)` entries for duplicate detection,
//! and [`MultiWalker`] for chaining several roots into one stream.
//!
//! # Behavior
//!
//! - Only regular files are emitted.
//! - Symbolic links are never followed and never emitted. A symlink to a
//!   regular file is not an additional copy of its target's bytes, and
//!   following links can loop; skipping is the documented policy.
//! - Hidden files are scanned like any other file.
//! - Unreadable directories and entries that fail to stat are skipped
//!   with a yielded [`ScanError`]; the walk itself never aborts.
//! - Directory children are sorted so traversal order is stable for a
//!   given filesystem state.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileEntry, ScanError};

/// Directory walker for file discovery under a single root.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::Walker;
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."));
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Returns an iterator over [`FileEntry`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration; callers
    /// that only care about reachable files can `filter_map(Result::ok)`.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _state, children| {
                // Sort children for deterministic traversal order.
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    let path = entry.path();

                    // stat without following links; the size query can
                    // still fail (entry deleted mid-walk, EACCES).
                    match std::fs::symlink_metadata(&path) {
                        Ok(metadata) if metadata.is_file() => {
                            Some(Ok(FileEntry::new(path, metadata.len())))
                        }
                        Ok(_) => None,
                        Err(e) => Some(Err(stat_error(path, e))),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::debug!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        })
    }
}

/// Walker over several roots, chaining their file streams in root order.
#[derive(Debug)]
pub struct MultiWalker {
    roots: Vec<PathBuf>,
}

impl MultiWalker {
    /// Create a walker over the given roots.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Walk all roots in order, yielding file entries.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        // Each root is collected before the next begins; the entries are
        // needed in memory for size bucketing anyway.
        self.roots.iter().flat_map(|root| {
            let walker = Walker::new(root);
            let entries: Vec<_> = walker.walk().collect();
            entries.into_iter()
        })
    }
}

fn stat_error(path: PathBuf, error: std::io::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path)
        }
        ErrorKind::NotFound => {
            log::debug!("File vanished during walk: {}", path.display());
            ScanError::NotFound(path)
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path,
                source: error,
            }
        }
    }
}
