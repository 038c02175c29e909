//! Parallel hash engine: fork-join digest computation for one stage.
//!
//! # Overview
//!
//! Given a stage's survivor set, the engine computes every candidate's
//! stage digest on `W` worker threads (`W` = hardware parallelism) and
//! merges the per-worker results into collision groups keyed by
//! `(size, digest)`. Only groups with two or more members are returned;
//! everything else has just been proven unique at this stage.
//!
//! # Work partitioning
//!
//! Candidates are dealt round-robin over the input order into `W`
//! partitions. This is deterministic, needs no pre-scan, and keeps the
//! per-worker byte totals comparable in expectation.
//!
//! # Isolation
//!
//! Workers share no mutable state: each owns its partition, one reusable
//! read buffer, and a worker-local result map. Files are opened and
//! closed within a single digest call, so no descriptor outlives one
//! file's hashing on any path. The stage is a strict fork-join barrier;
//! the merge runs single-threaded after every worker has finished.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::thread;

use crate::scanner::{digest_file, Candidate, Digest, Strategy};

/// Candidates sharing one `(size, digest)` pair at some stage.
#[derive(Debug, Clone)]
pub struct DigestGroup {
    /// Byte size shared by all members
    pub size: u64,
    /// The colliding stage digest
    pub digest: Digest,
    /// Members in path order; always 2 or more
    pub members: Vec<Candidate>,
}

/// Errors from stage orchestration.
///
/// Per-file failures never surface here (they become sentinel digests);
/// this covers only fatal engine conditions.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// A hash worker thread panicked.
    #[error("hash worker thread panicked")]
    WorkerPanicked,
}

/// Number of worker threads for hashing stages.
#[must_use]
pub fn worker_count() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Compute stage digests for `candidates` and group the collisions.
///
/// `buffer_size` is the stage's read-buffer length; together with
/// `strategy` it selects the sampling behavior (see
/// [`crate::scanner::hasher`]). Returns the groups with 2+ members,
/// sorted by size then first path, with members sorted by path, so the
/// output is deterministic regardless of thread scheduling.
///
/// # Errors
///
/// Returns [`EngineError::WorkerPanicked`] if a worker thread dies; the
/// run cannot be trusted past that point and is aborted.
pub fn hash_stage(
    strategy: Strategy,
    buffer_size: usize,
    candidates: Vec<Candidate>,
) -> Result<Vec<DigestGroup>, EngineError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let workers = worker_count();
    let per_worker = candidates.len() / workers + 1;
    let mut partitions: Vec<Vec<Candidate>> = (0..workers)
        .map(|_| Vec::with_capacity(per_worker))
        .collect();
    for (i, candidate) in candidates.into_iter().enumerate() {
        partitions[i % workers].push(candidate);
    }

    if log::log_enabled!(log::Level::Debug) {
        for (i, partition) in partitions.iter().enumerate() {
            if partition.is_empty() {
                continue;
            }
            let total: u64 = partition.iter().map(|c| c.size).sum();
            log::debug!("thread [{}]: files to scan: {}", i, partition.len());
            log::debug!(
                "thread [{}]: total size: {:.3} MiB",
                i,
                total as f64 / 1024.0 / 1024.0
            );
        }
    }

    let worker_maps = thread::scope(|scope| {
        let handles: Vec<_> = partitions
            .into_iter()
            .enumerate()
            .filter(|(_, partition)| !partition.is_empty())
            .map(|(id, partition)| {
                scope.spawn(move || hash_partition(id, strategy, buffer_size, partition))
            })
            .collect();

        // Join every handle before inspecting results; leaving a panicked
        // handle unjoined would turn into a panic at scope exit instead
        // of the typed error.
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        joined
            .into_iter()
            .map(|result| result.map_err(|_| EngineError::WorkerPanicked))
            .collect::<Result<Vec<_>, _>>()
    })?;

    // Union per-digest lists across workers; collisions between files on
    // different workers must still be seen.
    let mut merged: HashMap<(u64, Digest), Vec<Candidate>> = HashMap::new();
    for local in worker_maps {
        for (key, mut members) in local {
            merged.entry(key).or_default().append(&mut members);
        }
    }

    let mut groups: Vec<DigestGroup> = merged
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|((size, digest), mut members)| {
            members.sort_by(|a, b| a.path.cmp(&b.path));
            DigestGroup {
                size,
                digest,
                members,
            }
        })
        .collect();
    groups.sort_by(|a, b| {
        a.size
            .cmp(&b.size)
            .then_with(|| a.members[0].path.cmp(&b.members[0].path))
    });

    Ok(groups)
}

/// One worker: digest every assigned candidate into a local map.
fn hash_partition(
    id: usize,
    strategy: Strategy,
    buffer_size: usize,
    candidates: Vec<Candidate>,
) -> HashMap<(u64, Digest), Vec<Candidate>> {
    log::debug!("thread [{}]: started", id);

    let mut buffer = vec![0u8; buffer_size];
    let mut local: HashMap<(u64, Digest), Vec<Candidate>> = HashMap::new();

    for candidate in candidates {
        let digest = digest_file(&candidate.path, candidate.size, strategy, &mut buffer);
        log::trace!(
            "thread [{}]: {} -> {}",
            id,
            candidate.path.display(),
            crate::scanner::digest_to_hex(&digest)
        );
        local
            .entry((candidate.size, digest))
            .or_default()
            .push(candidate);
    }

    log::debug!("thread [{}]: finished", id);
    local
}
