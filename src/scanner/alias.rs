//! Alias coalescing: grouping paths that are the same underlying file.
//!
//! # Overview
//!
//! Hardlinks are multiple directory entries pointing to the same inode on
//! disk. They share the same bytes by construction, so hashing more than
//! one of them is wasted I/O, and reporting them as content duplicates
//! would be misleading. Within each size bucket this module partitions the
//! paths into alias groups (same device + inode), forwards exactly one
//! representative per group into the hashing funnel, and keeps groups with
//! two or more paths for final reporting as known-same sets.
//!
//! # Platform Support
//!
//! - **Unix**: Uses (device_id, inode) pairs from file metadata
//! - **Other**: No alias notion; every path is a singleton group
//!
//! Paths whose metadata cannot be read produce no alias info and are
//! treated as singleton groups; they stay candidates and fall into the
//! sentinel digest group once hashing fails on them too.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::Metadata;
use std::path::PathBuf;

/// A set of same-size paths the OS reports as one underlying file.
///
/// Groups are immutable once built and survive until final reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasGroup {
    /// Byte size shared by every path in the group
    pub size: u64,
    /// Paths in sorted order; the first is the funnel representative
    pub paths: Vec<PathBuf>,
}

/// A representative file moving through the hashing funnel.
///
/// One candidate enters the funnel per alias group; its per-stage digest
/// lives in the stage's grouping map, and the candidate moves forward on
/// survival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Representative path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Partition one size bucket into alias groups.
///
/// Returns the funnel candidates (one per group, in deterministic order)
/// and the alias groups that contain two or more paths. Paths are sorted
/// before grouping, so the representative of each group is its
/// lexicographically smallest path and the whole partition is stable for
/// a given filesystem state.
///
/// # Example
///
/// ```no_run
/// use dupescan::scanner::coalesce_bucket;
/// use std::path::PathBuf;
///
/// let paths = vec![PathBuf::from("/data/b"), PathBuf::from("/data/a")];
/// let (candidates, aliases) = coalesce_bucket(1024, paths);
/// assert_eq!(candidates.len() + aliases.iter().map(|g| g.paths.len() - 1).sum::<usize>(), 2);
/// ```
#[must_use]
pub fn coalesce_bucket(size: u64, mut paths: Vec<PathBuf>) -> (Vec<Candidate>, Vec<AliasGroup>) {
    paths.sort();

    let mut groups: Vec<Vec<PathBuf>> = Vec::with_capacity(paths.len());
    let mut by_key: HashMap<InodeKey, usize> = HashMap::new();

    for path in paths {
        let key = std::fs::symlink_metadata(&path)
            .ok()
            .as_ref()
            .and_then(InodeKey::from_metadata);

        match key {
            Some(key) => match by_key.entry(key) {
                Entry::Occupied(slot) => groups[*slot.get()].push(path),
                Entry::Vacant(slot) => {
                    slot.insert(groups.len());
                    groups.push(vec![path]);
                }
            },
            // No alias info (unsupported platform or unreadable path):
            // singleton group.
            None => {
                log::debug!("No inode identity for {}, treating as singleton", path.display());
                groups.push(vec![path]);
            }
        }
    }

    let mut candidates = Vec::with_capacity(groups.len());
    let mut alias_groups = Vec::new();

    for group in groups {
        candidates.push(Candidate {
            path: group[0].clone(),
            size,
        });
        if group.len() >= 2 {
            alias_groups.push(AliasGroup { size, paths: group });
        }
    }

    (candidates, alias_groups)
}

/// Platform-specific inode key for alias detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct InodeKey {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
    #[cfg(not(unix))]
    _phantom: (),
}

impl InodeKey {
    /// Create an inode key from file metadata.
    ///
    /// Returns `None` if the platform has no inode notion.
    #[cfg(unix)]
    fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}
