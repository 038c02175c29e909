//! Size-based bucketing, the first elimination pass.
//!
//! # Overview
//!
//! Files with different sizes cannot be byte-identical, so grouping by
//! exact size eliminates most of a typical tree without any file I/O.
//! Buckets with a single entry are counted and dropped; the survivors
//! feed the alias coalescer and the hashing funnel.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileEntry;
//! use dupescan::duplicates::bucket_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/a.txt"), 100),
//!     FileEntry::new(PathBuf::from("/b.txt"), 100),
//!     FileEntry::new(PathBuf::from("/c.txt"), 200),
//! ];
//!
//! let (buckets, stats) = bucket_by_size(files);
//!
//! // Only the 100-byte bucket survives (it has 2 files).
//! assert_eq!(buckets.len(), 1);
//! assert_eq!(buckets[&100].len(), 2);
//! assert_eq!(stats.files_found, 3);
//! assert_eq!(stats.files_with_unique_size, 1);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// Statistics from the size bucketing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of regular files enumerated
    pub files_found: u64,
    /// Files dropped because no other file shares their size
    pub files_with_unique_size: u64,
    /// Number of distinct sizes seen
    pub unique_sizes: u64,
    /// Number of buckets with 2+ files that continue into the funnel
    pub duplicate_buckets: u64,
}

/// Group files by exact byte size.
///
/// Returns the surviving buckets keyed by size (ordered, so every later
/// pass and the final report iterate sizes ascending) together with the
/// pass statistics. Singleton buckets are counted in
/// [`GroupingStats::files_with_unique_size`] and discarded.
#[must_use]
pub fn bucket_by_size(
    entries: impl IntoIterator<Item = FileEntry>,
) -> (BTreeMap<u64, Vec<PathBuf>>, GroupingStats) {
    let mut buckets: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for entry in entries {
        stats.files_found += 1;
        buckets.entry(entry.size).or_default().push(entry.path);
    }

    stats.unique_sizes = buckets.len() as u64;

    buckets.retain(|size, paths| {
        if paths.len() == 1 {
            stats.files_with_unique_size += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                paths[0].display()
            );
            false
        } else {
            stats.duplicate_buckets += 1;
            log::debug!("Size bucket {} bytes: {} files", size, paths.len());
            true
        }
    });

    (buckets, stats)
}
