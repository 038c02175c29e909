//! Process exit codes.

/// Exit codes for the dupescan binary.
///
/// - 0: Completed run (duplicates found or not)
/// - 1: Internal error (no usable root, worker failure)
/// - 2: Argument error (reserved; clap exits with its own code on parse failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run completed; any duplicates found were reported.
    Completed = 0,
    /// An internal error aborted the run.
    InternalError = 1,
    /// Invalid command-line arguments.
    ArgumentError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
