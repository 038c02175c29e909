//! BLAKE3 stage digests with partial-read sampling strategies.
//!
//! # Overview
//!
//! Each funnel stage fingerprints its candidates with one of three
//! sampling strategies:
//!
//! - [`Strategy::Corners`]: digest of the first and last `buffer` bytes,
//!   in that order, with a random-access read-ahead hint. Cheap rejection
//!   of files that differ in a header or trailer.
//! - [`Strategy::Middle`]: digest of `buffer` bytes around the file
//!   midpoint. Discriminates files with identical framing but different
//!   interiors, common for container formats.
//! - [`Strategy::Sequential`]: digest of the whole file, streamed in
//!   `buffer`-sized chunks with a sequential read-ahead hint. The only
//!   sound confirmation; also the fallback when a file is too small for a
//!   partial strategy to make sense.
//!
//! The digest is BLAKE3, truncated to nothing: the full 32-byte output.
//! Equal input implies equal output, which is all the funnel needs;
//! collision resistance is what lets stage 4 treat digest equality as a
//! proxy for byte equality.
//!
//! # Failure handling
//!
//! A file whose open, seek, or read fails yields the reserved all-zero
//! [`SENTINEL_DIGEST`]. Sentinel files cluster together within their size
//! class and ride the funnel like any other collision group, so one
//! unreadable member never silently knocks out a real duplicate pair.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Digest length in bytes, fixed by BLAKE3.
pub const DIGEST_LEN: usize = 32;

/// A stage digest value.
pub type Digest = [u8; DIGEST_LEN];

/// Reserved digest for files whose read failed.
///
/// BLAKE3 never produces this value for any input in practice, and the
/// digest never leaves the process, so a reserved constant is safe.
pub const SENTINEL_DIGEST: Digest = [0; DIGEST_LEN];

/// Partial-read sampling strategy for one funnel stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Stream the whole file from offset 0.
    Sequential,
    /// First `buffer` bytes, then the last `buffer` bytes.
    /// Falls back to `Sequential` when `size <= 2 * buffer`.
    Corners,
    /// `buffer` bytes starting at `size/2 - buffer/2`.
    /// Falls back to `Sequential` when `size <= buffer`.
    Middle,
}

/// Compute the stage digest of one file.
///
/// `buffer` is the caller's reusable read buffer; its length is the
/// stage's buffer size and selects the small-file fallbacks. The file is
/// opened, hinted, read, and closed within this call; no descriptor
/// outlives it on any path.
///
/// Never fails: any I/O error is reduced to [`SENTINEL_DIGEST`].
#[must_use]
pub fn digest_file(path: &Path, size: u64, strategy: Strategy, buffer: &mut [u8]) -> Digest {
    match try_digest(path, size, strategy, buffer) {
        Ok(digest) => digest,
        Err(e) => {
            log::debug!(
                "Hashing failed for {}: {}; recording sentinel digest",
                path.display(),
                e
            );
            SENTINEL_DIGEST
        }
    }
}

fn try_digest(path: &Path, size: u64, strategy: Strategy, buffer: &mut [u8]) -> io::Result<Digest> {
    let mut file = File::open(path)?;
    let buffer_len = buffer.len() as u64;

    match strategy {
        Strategy::Corners if size > 2 * buffer_len => digest_corners(&mut file, buffer),
        Strategy::Middle if size > buffer_len => digest_middle(&mut file, size, buffer),
        Strategy::Sequential | Strategy::Corners | Strategy::Middle => {
            digest_sequential(&mut file, buffer)
        }
    }
}

/// Whole-file digest, streamed in `buffer`-sized chunks.
fn digest_sequential(file: &mut File, buffer: &mut [u8]) -> io::Result<Digest> {
    fadvise_sequential(file);

    let mut hasher = blake3::Hasher::new();
    loop {
        let n = file.read(buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Digest of the first and last `buffer.len()` bytes, in that order.
///
/// Caller guarantees `size > 2 * buffer.len()`, so the two windows never
/// overlap.
fn digest_corners(file: &mut File, buffer: &mut [u8]) -> io::Result<Digest> {
    fadvise_random(file);

    let mut hasher = blake3::Hasher::new();

    file.read_exact(buffer)?;
    hasher.update(buffer);

    file.seek(SeekFrom::End(-(buffer.len() as i64)))?;
    file.read_exact(buffer)?;
    hasher.update(buffer);

    Ok(*hasher.finalize().as_bytes())
}

/// Digest of `buffer.len()` bytes around the file midpoint.
///
/// Caller guarantees `size > buffer.len()`.
fn digest_middle(file: &mut File, size: u64, buffer: &mut [u8]) -> io::Result<Digest> {
    fadvise_random(file);

    let offset = (size / 2).saturating_sub(buffer.len() as u64 / 2);
    file.seek(SeekFrom::Start(offset))?;

    let mut hasher = blake3::Hasher::new();
    file.read_exact(buffer)?;
    hasher.update(buffer);

    Ok(*hasher.finalize().as_bytes())
}

/// Render a digest as lowercase hex, for diagnostics.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(DIGEST_LEN * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Hint the kernel to use aggressive sequential readahead for the file.
#[cfg(target_os = "linux")]
fn fadvise_sequential(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is valid for the duration of the call; the
    // hint is advisory and has no failure mode we care about.
    unsafe {
        libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL);
    }
}

#[cfg(not(target_os = "linux"))]
fn fadvise_sequential(_file: &File) {}

/// Hint the kernel that access will be random (disable readahead).
#[cfg(target_os = "linux")]
fn fadvise_random(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: see fadvise_sequential.
    unsafe {
        libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_RANDOM);
    }
}

#[cfg(not(target_os = "linux"))]
fn fadvise_random(_file: &File) {}
