//! The structured outcome of one pipeline run.

use super::status::{JobState, StageState};
use crate::error::{ExecError, Result};
use serde::Serialize;
use std::time::Duration;

/// What a run produced.
///
/// A child that failed is still a successful *run*: its failure is recorded
/// here, in `state` and the status strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The pipeline that ran, as produced by `command_string`.
    pub command: String,
    /// Captured standard output, decoded and normalized.
    pub output: String,
    /// Captured standard error, decoded and normalized.
    pub error: String,
    /// Overall status: the exit code as text, or a description of how the
    /// pipeline ended abnormally.
    pub result: String,
    /// Per-stage status: `;`-joined exit codes when the pipeline exited,
    /// otherwise the same text as `result`.
    pub results: String,
    pub state: JobState,
    pub stage_states: Vec<StageState>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub(crate) fn new(
        command: String,
        output: String,
        error: String,
        state: JobState,
        stage_states: Vec<StageState>,
        duration: Duration,
    ) -> Self {
        Self {
            command,
            output,
            error,
            result: state.describe(),
            results: state.describe_stages(&stage_states),
            state,
            stage_states,
            duration,
        }
    }

    /// The overall exit code, if the pipeline exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self.state {
            JobState::Exited(code) => Some(code),
            _ => None,
        }
    }

    /// True when the pipeline exited normally with code 0.
    pub fn is_success(&self) -> bool {
        self.exit_code() == Some(0)
    }

    pub fn timed_out(&self) -> bool {
        self.state == JobState::TimedOut
    }

    /// Human-readable report of what ran and how it ended.
    pub fn failure_report(&self) -> String {
        let mut report = format!(
            "Command:\n{}\nResult: {}\nResults: {}\n",
            self.command, self.result, self.results
        );
        if !self.output.is_empty() {
            report.push_str("\nOutput:\n");
            report.push_str(&self.output);
            report.push('\n');
        }
        if !self.error.is_empty() {
            report.push_str("\nError:\n");
            report.push_str(&self.error);
            report.push('\n');
        }
        report
    }

    /// Turn a non-success result into [`ExecError::ProcessFailed`].
    pub fn check(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ExecError::ProcessFailed(self.failure_report()))
        }
    }

    /// Serializable view used for `--json` output and the run log.
    pub fn summary(&self) -> ResultSummary<'_> {
        ResultSummary {
            command: &self.command,
            result: &self.result,
            results: &self.results,
            output: &self.output,
            error: &self.error,
            duration_ms: u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultSummary<'a> {
    pub command: &'a str,
    pub result: &'a str,
    pub results: &'a str,
    pub output: &'a str,
    pub error: &'a str,
    pub duration_ms: u64,
}
