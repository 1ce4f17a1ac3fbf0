//! Run log for execproc.
//!
//! Each run can be appended to an NDJSON file (one JSON object per line) so
//! that a series of invocations leaves an audit trail.
//!
//! # Record Format
//!
//! - `ts`: RFC3339 timestamp
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `command`: the pipeline's command string
//! - `working_directory`: where the pipeline ran, if set
//! - `result` / `results`: overall and per-stage status
//! - `duration_ms`: wall-clock duration of the run
//!
//! ```no_run
//! use execproc::events::{RunRecord, append_record};
//! use execproc::process::Runner;
//!
//! let mut runner = Runner::with_command(["true"])?;
//! let result = runner.run()?;
//! let record = RunRecord::from_result(result, None);
//! append_record("runs.ndjson", &record)?;
//! # Ok::<(), execproc::error::ExecError>(())
//! ```

use crate::error::{ExecError, Result};
use crate::process::ExecutionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One line of the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// RFC3339 timestamp when the run finished.
    pub ts: DateTime<Utc>,

    /// Who ran it (e.g., `user@HOST`).
    pub actor: String,

    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    pub result: String,

    pub results: String,

    pub duration_ms: u64,
}

impl RunRecord {
    /// Build a record for a finished run.
    pub fn from_result(result: &ExecutionResult, working_directory: Option<&Path>) -> Self {
        Self {
            ts: Utc::now(),
            actor: get_actor_string(),
            command: result.command.clone(),
            working_directory: working_directory.map(|p| p.display().to_string()),
            result: result.result.clone(),
            results: result.results.clone(),
            duration_ms: u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Serialize the record to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ExecError::UserError(format!("failed to serialize run record to JSON: {}", e))
        })
    }
}

/// Get the actor string for record metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append a record to the run log at `path`.
///
/// The file and its parent directory are created if missing. Each append
/// writes exactly one line.
pub fn append_record<P: AsRef<Path>>(path: P, record: &RunRecord) -> Result<()> {
    let path = path.as_ref();
    let json_line = record.to_ndjson_line()?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            ExecError::UserError(format!(
                "failed to create run log directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ExecError::UserError(format!(
                "failed to open run log '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ExecError::UserError(format!(
            "failed to write run record to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read every record from a run log.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<RunRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ExecError::UserError(format!("failed to read run log '{}': {}", path.display(), e))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| {
                ExecError::UserError(format!("malformed run log line in '{}': {}", path.display(), e))
            })
        })
        .collect()
}
