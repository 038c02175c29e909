//! Duplicate finder: the multi-stage elimination funnel.
//!
//! # Overview
//!
//! This module orchestrates the whole pipeline:
//!
//! 1. Enumerate regular files under the roots ([`crate::scanner::walker`])
//! 2. Bucket by exact size, dropping uniquely-sized files
//!    ([`crate::duplicates::groups`])
//! 3. Coalesce hardlinked/equivalent paths into alias groups, one funnel
//!    representative each ([`crate::scanner::alias`])
//! 4. Run the four-stage hashing funnel, each stage keeping only
//!    candidates whose `(size, digest)` collides with another survivor
//!    ([`crate::duplicates::engine`])
//! 5. Emit alias groups and confirmed content groups, deterministically
//!    sorted ([`crate::report`])
//!
//! Every stage over-approximates content equality: partial digests can
//! only ever fail to split files that differ, never split files that are
//! equal, so no true duplicate is lost before the whole-file stage
//! confirms it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::duplicates::engine::{hash_stage, DigestGroup, EngineError};
use crate::duplicates::groups::bucket_by_size;
use crate::report::{Reporter, SameGroup};
use crate::scanner::{coalesce_bucket, AliasGroup, Candidate, MultiWalker, Strategy};

/// Counters emitted before the funnel starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Regular files enumerated under the roots
    pub files_found: u64,
    /// Files eliminated because their size is unique
    pub files_with_unique_size: u64,
    /// Funnel candidates after alias coalescing
    pub files_to_scan: u64,
}

/// One funnel stage with its sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 4 KiB corners
    Corners4K,
    /// 64 KiB corners
    Corners64K,
    /// 64 KiB middle window
    Middle64K,
    /// Whole-file sequential read
    WholeRead,
}

impl Stage {
    /// The four stages in funnel order.
    pub const ALL: [Stage; 4] = [
        Stage::Corners4K,
        Stage::Corners64K,
        Stage::Middle64K,
        Stage::WholeRead,
    ];

    /// Stage label used in the stdout contract.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Corners4K => "4KiB corners",
            Stage::Corners64K => "64KiB corners",
            Stage::Middle64K => "64KiB middle",
            Stage::WholeRead => "whole read",
        }
    }

    fn strategy(self) -> Strategy {
        match self {
            Stage::Corners4K | Stage::Corners64K => Strategy::Corners,
            Stage::Middle64K => Strategy::Middle,
            Stage::WholeRead => Strategy::Sequential,
        }
    }

    fn buffer_size(self) -> usize {
        match self {
            Stage::Corners4K | Stage::WholeRead => 4096,
            Stage::Corners64K | Stage::Middle64K => 65536,
        }
    }
}

/// Errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The parallel engine failed (worker thread died).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The report stream could not be written.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Results of a completed run, as returned to library callers.
///
/// The same information is emitted through the [`Reporter`] during the
/// run; this struct exists so tests and embedders get structured data.
#[derive(Debug, Clone, Default)]
pub struct DuplicateReport {
    /// Pre-funnel counters
    pub summary: ScanSummary,
    /// All emitted groups (aliases and confirmed content duplicates),
    /// in emission order
    pub groups: Vec<SameGroup>,
}

/// The duplicate detection pipeline.
#[derive(Debug, Default)]
pub struct DuplicateFinder;

impl DuplicateFinder {
    /// Create a finder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline over `roots`, emitting progress and results
    /// through `reporter`.
    ///
    /// Roots that cannot be walked contribute no files; per-entry scan
    /// errors are logged and skipped. The run only fails on engine or
    /// output errors.
    ///
    /// # Errors
    ///
    /// See [`FinderError`].
    pub fn run<W: std::io::Write>(
        &self,
        roots: &[PathBuf],
        reporter: &mut Reporter<W>,
    ) -> Result<DuplicateReport, FinderError> {
        // 1. Enumerate. Errors were already logged by the walker; a file
        // we cannot stat simply never becomes a candidate.
        let walker = MultiWalker::new(roots.to_vec());
        let entries: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        // 2. Size buckets.
        let (buckets, stats) = bucket_by_size(entries);

        // 3. Alias coalescing, one bucket at a time.
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut alias_groups: Vec<AliasGroup> = Vec::new();
        for (size, paths) in buckets {
            let (bucket_candidates, bucket_aliases) = coalesce_bucket(size, paths);
            candidates.extend(bucket_candidates);
            alias_groups.extend(bucket_aliases);
        }

        let summary = ScanSummary {
            files_found: stats.files_found,
            files_with_unique_size: stats.files_with_unique_size,
            files_to_scan: candidates.len() as u64,
        };
        reporter.counters(&summary)?;

        // 4. The funnel. Survivors of each stage feed the next; the
        // whole-read stage's groups are the confirmed duplicates.
        log::debug!("hashing with {} worker threads", crate::duplicates::worker_count());
        let mut survivors = candidates;
        let mut confirmed: Vec<DigestGroup> = Vec::new();
        for stage in Stage::ALL {
            if survivors.is_empty() {
                log::info!("Funnel drained before {}", stage.label());
                break;
            }
            reporter.stage(stage.label(), survivors.len())?;

            let stage_groups = hash_stage(stage.strategy(), stage.buffer_size(), survivors)?;
            if stage == Stage::WholeRead {
                confirmed = stage_groups;
                survivors = Vec::new();
            } else {
                survivors = stage_groups
                    .into_iter()
                    .flat_map(|group| group.members)
                    .collect();
            }
        }

        // 5. Assemble and emit the final groups.
        let groups = assemble_groups(confirmed, alias_groups);
        for group in &groups {
            reporter.same(group)?;
        }

        Ok(DuplicateReport { summary, groups })
    }
}

/// Build the emission set: confirmed content groups expanded with their
/// members' alias paths, plus alias groups whose representative never
/// reached a confirmed group. Sorted by size ascending, then first path.
fn assemble_groups(confirmed: Vec<DigestGroup>, alias_groups: Vec<AliasGroup>) -> Vec<SameGroup> {
    let rep_index: HashMap<&Path, usize> = alias_groups
        .iter()
        .enumerate()
        .map(|(i, group)| (group.paths[0].as_path(), i))
        .collect();

    let mut covered = vec![false; alias_groups.len()];
    let mut groups: Vec<SameGroup> = Vec::new();

    for digest_group in confirmed {
        let mut paths: Vec<PathBuf> = Vec::new();
        for member in &digest_group.members {
            match rep_index.get(member.path.as_path()) {
                Some(&i) => {
                    covered[i] = true;
                    paths.extend(alias_groups[i].paths.iter().cloned());
                }
                None => paths.push(member.path.clone()),
            }
        }
        paths.sort();
        groups.push(SameGroup {
            size: digest_group.size,
            paths,
        });
    }

    drop(rep_index);
    for (i, alias) in alias_groups.into_iter().enumerate() {
        if !covered[i] {
            groups.push(SameGroup {
                size: alias.size,
                paths: alias.paths,
            });
        }
    }

    groups.sort_by(|a, b| {
        a.size
            .cmp(&b.size)
            .then_with(|| a.paths.cmp(&b.paths))
    });
    groups
}
