//! The stable stdout contract: progress counters and `same` lines.
//!
//! Everything a consumer may parse goes through [`Reporter`]; diagnostics
//! stay on the `log` facade so `RUST_LOG` and `-v` can never corrupt the
//! machine-readable stream. The binary hands the reporter a locked
//! stdout; tests hand it a `Vec<u8>` and assert on the captured bytes.
//!
//! Line formats:
//!
//! ```text
//! files found: N
//! files with unique size: N
//! files to scan: N
//! Eliminating by <stage>: N files
//! same <path> <path> ...
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use crate::duplicates::ScanSummary;

/// One emitted duplicate group: paths proven to refer to the same bytes,
/// either by OS identity (aliases) or by the stage-4 digest, expanded
/// with each member's alias paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SameGroup {
    /// Byte size of every member
    pub size: u64,
    /// Member paths in sorted order
    pub paths: Vec<PathBuf>,
}

/// Writer for the stable stdout contract.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter over the given stream.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit the pre-funnel counters.
    ///
    /// # Errors
    ///
    /// Propagates write failures (e.g. a closed pipe).
    pub fn counters(&mut self, summary: &ScanSummary) -> io::Result<()> {
        writeln!(self.out, "files found: {}", summary.files_found)?;
        writeln!(
            self.out,
            "files with unique size: {}",
            summary.files_with_unique_size
        )?;
        writeln!(self.out, "files to scan: {}", summary.files_to_scan)
    }

    /// Emit one stage-entry line.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn stage(&mut self, label: &str, survivors: usize) -> io::Result<()> {
        writeln!(self.out, "Eliminating by {}: {} files", label, survivors)
    }

    /// Emit one duplicate group as a `same` line.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn same(&mut self, group: &SameGroup) -> io::Result<()> {
        write!(self.out, "same")?;
        for path in &group.paths {
            write!(self.out, " {}", path.display())?;
        }
        writeln!(self.out)
    }

    /// Flush and recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
