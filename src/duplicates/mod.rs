//! Duplicate detection module.
//!
//! # Architecture
//!
//! Detection is a funnel: each pass consumes the survivors of the
//! previous one and is strictly cheaper per eliminated file than the
//! next.
//!
//! 1. **Size bucketing** ([`groups`]): files with a unique size cannot
//!    have a duplicate and are dropped without any I/O.
//! 2. **Alias coalescing** (in [`crate::scanner::alias`]): hardlinked
//!    paths are the same bytes by construction; one representative per
//!    inode enters hashing.
//! 3. **Partial digests** ([`engine`] + [`crate::scanner::hasher`]):
//!    4 KiB corners, then 64 KiB corners, then a 64 KiB middle window.
//!    Each pass re-groups by `(size, digest)` and keeps only collisions.
//! 4. **Whole-file digest**: the only sound confirmation, reached by
//!    small, already-correlated survivor sets.
//!
//! Orchestration lives in [`finder`]; the stable stdout surface lives in
//! [`crate::report`].

pub mod engine;
pub mod finder;
pub mod groups;

pub use engine::{hash_stage, worker_count, DigestGroup, EngineError};
pub use finder::{DuplicateFinder, DuplicateReport, FinderError, ScanSummary, Stage};
pub use groups::{bucket_by_size, GroupingStats};
