//! Exit code constants for the execproc CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, malformed pipeline, invalid job file)
//! - 2: Process failure (only with `--check`, when the pipeline did not succeed)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed pipeline, or invalid job file.
pub const USER_ERROR: i32 = 1;

/// The pipeline ran but did not succeed and the caller asked for a check.
pub const PROCESS_FAILURE: i32 = 2;
