//! Error types for execproc.
//!
//! Uses thiserror for derive macros. Only caller mistakes are errors here:
//! anything a child process does (non-zero exit, signal, launch failure,
//! timeout) is reported through [`crate::process::ExecutionResult`].

use crate::exit_codes;
use thiserror::Error;

/// Main error type for execproc operations.
#[derive(Error, Debug)]
pub enum ExecError {
    /// Malformed pipeline or options. No process was launched.
    #[error("{0}")]
    InvalidArgument(String),

    /// Bad CLI input, unreadable job file, or an unwritable run log.
    #[error("{0}")]
    UserError(String),

    /// The pipeline ran but did not succeed, and the caller asked for a check.
    #[error("Process failed:\n{0}")]
    ProcessFailed(String),
}

impl ExecError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::InvalidArgument(_) => exit_codes::USER_ERROR,
            ExecError::UserError(_) => exit_codes::USER_ERROR,
            ExecError::ProcessFailed(_) => exit_codes::PROCESS_FAILURE,
        }
    }
}

/// Result type alias for execproc operations.
pub type Result<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_has_correct_exit_code() {
        let err = ExecError::InvalidArgument("no stages".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = ExecError::UserError("bad job file".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn process_failed_has_correct_exit_code() {
        let err = ExecError::ProcessFailed("exit 1".to_string());
        assert_eq!(err.exit_code(), exit_codes::PROCESS_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = ExecError::InvalidArgument("called with no COMMAND argument".to_string());
        assert_eq!(err.to_string(), "called with no COMMAND argument");

        let err = ExecError::ProcessFailed("Result: 1".to_string());
        assert_eq!(err.to_string(), "Process failed:\nResult: 1");
    }
}
