//! Execution options attached to a [`Runner`](super::Runner).

use crate::error::{ExecError, Result};
use crate::text::Encoding;
use std::path::PathBuf;
use std::time::Duration;

/// Options controlling how a pipeline is executed.
///
/// The defaults keep standard output quiet and echo standard error, and strip
/// trailing whitespace from standard error only.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOptions {
    /// Working directory for every stage (None = the caller's directory).
    pub working_directory: Option<PathBuf>,
    /// Wall-clock limit for the whole pipeline (None or zero = unbounded).
    pub timeout: Option<Duration>,
    /// File fed to the first stage's standard input.
    pub input_file: Option<PathBuf>,
    /// File receiving the last stage's standard output instead of memory.
    pub output_file: Option<PathBuf>,
    /// File receiving every stage's standard error instead of memory.
    pub error_file: Option<PathBuf>,
    /// Do not echo captured output to our stdout.
    pub output_quiet: bool,
    /// Do not echo captured errors to our stderr.
    pub error_quiet: bool,
    /// Strip trailing whitespace from captured output.
    pub strip_output: bool,
    /// Strip trailing whitespace from captured errors.
    pub strip_error: bool,
    /// Merge standard error into standard output even without files.
    pub merge_output: bool,
    /// Encoding of the children's output.
    pub encoding: Encoding,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            working_directory: None,
            timeout: None,
            input_file: None,
            output_file: None,
            error_file: None,
            output_quiet: true,
            error_quiet: false,
            strip_output: false,
            strip_error: true,
            merge_output: false,
            encoding: Encoding::None,
        }
    }
}

impl ExecutionOptions {
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = non_empty(dir.into());
        self
    }

    /// Bound the whole pipeline's runtime. A zero timeout means no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = bounded(timeout);
        self
    }

    /// Set the timeout from a seconds value; see [`parse_timeout_secs`].
    pub fn with_timeout_secs(mut self, secs: f64) -> Result<Self> {
        self.timeout = bounded(parse_timeout_secs(secs)?);
        Ok(self)
    }

    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = non_empty(path.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = non_empty(path.into());
        self
    }

    pub fn with_error_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_file = non_empty(path.into());
        self
    }

    pub fn with_output_quiet(mut self, quiet: bool) -> Self {
        self.output_quiet = quiet;
        self
    }

    pub fn with_error_quiet(mut self, quiet: bool) -> Self {
        self.error_quiet = quiet;
        self
    }

    pub fn with_strip_output(mut self, strip: bool) -> Self {
        self.strip_output = strip;
        self
    }

    pub fn with_strip_error(mut self, strip: bool) -> Self {
        self.strip_error = strip;
        self
    }

    pub fn with_merge_output(mut self, merge: bool) -> Self {
        self.merge_output = merge;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Whether standard error is merged into the standard output stream.
    ///
    /// True when explicitly requested, or when the error file names the same
    /// path (textually) as the output file.
    pub fn merges_output(&self) -> bool {
        if self.merge_output {
            return true;
        }
        matches!(
            (&self.output_file, &self.error_file),
            (Some(out), Some(err)) if out == err
        )
    }

    /// The timeout actually enforced on a run.
    ///
    /// `timeout` is a public field, so a zero set directly is resolved here.
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.and_then(bounded)
    }
}

/// Convert a seconds value into a timeout.
///
/// Negative, NaN, and infinite values are rejected.
pub fn parse_timeout_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ExecError::InvalidArgument(format!(
            "called with TIMEOUT value that could not be parsed: {}",
            secs
        ))
    })
}

/// Parse a textual timeout. An empty string or zero means no timeout.
pub fn parse_timeout(text: &str) -> Result<Option<Duration>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let secs: f64 = text.parse().map_err(|_| {
        ExecError::InvalidArgument(format!(
            "called with TIMEOUT value that could not be parsed: '{}'",
            text
        ))
    })?;

    parse_timeout_secs(secs).map(bounded)
}

fn bounded(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ExecutionOptions::default();
        assert!(opts.output_quiet);
        assert!(!opts.error_quiet);
        assert!(!opts.strip_output);
        assert!(opts.strip_error);
        assert!(opts.timeout.is_none());
        assert!(opts.working_directory.is_none());
        assert_eq!(opts.encoding, Encoding::None);
        assert!(!opts.merges_output());
    }

    #[test]
    fn empty_paths_mean_unset() {
        let opts = ExecutionOptions::default()
            .with_working_directory("")
            .with_input_file("")
            .with_output_file("")
            .with_error_file("");
        assert!(opts.working_directory.is_none());
        assert!(opts.input_file.is_none());
        assert!(opts.output_file.is_none());
        assert!(opts.error_file.is_none());
    }

    #[test]
    fn same_output_and_error_file_merges() {
        let opts = ExecutionOptions::default()
            .with_output_file("out.log")
            .with_error_file("out.log");
        assert!(opts.merges_output());

        let opts = ExecutionOptions::default()
            .with_output_file("out.log")
            .with_error_file("err.log");
        assert!(!opts.merges_output());

        // Only the error file set is not a merge.
        let opts = ExecutionOptions::default().with_error_file("err.log");
        assert!(!opts.merges_output());
    }

    #[test]
    fn explicit_merge_flag() {
        let opts = ExecutionOptions::default().with_merge_output(true);
        assert!(opts.merges_output());
    }

    #[test]
    fn parse_timeout_values() {
        assert_eq!(parse_timeout("").unwrap(), None);
        assert_eq!(parse_timeout("  ").unwrap(), None);
        assert_eq!(parse_timeout("1.5").unwrap(), Some(Duration::from_millis(1500)));
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(parse_timeout("0.0").unwrap(), None);
    }

    #[test]
    fn zero_timeout_is_unbounded() {
        let opts = ExecutionOptions::default().with_timeout(Duration::ZERO);
        assert!(opts.timeout.is_none());
        let opts = ExecutionOptions::default().with_timeout_secs(0.0).unwrap();
        assert!(opts.timeout.is_none());

        let opts = ExecutionOptions {
            timeout: Some(Duration::ZERO),
            ..ExecutionOptions::default()
        };
        assert_eq!(opts.effective_timeout(), None);
    }

    #[test]
    fn parse_timeout_rejects_garbage() {
        for bad in ["abc", "-1", "NaN", "inf"] {
            let err = parse_timeout(bad).unwrap_err();
            assert!(matches!(err, ExecError::InvalidArgument(_)), "{}", bad);
            assert!(err.to_string().contains("TIMEOUT"));
        }
    }

    #[test]
    fn with_timeout_secs_validates() {
        assert!(ExecutionOptions::default().with_timeout_secs(-0.5).is_err());
        let opts = ExecutionOptions::default().with_timeout_secs(0.25).unwrap();
        assert_eq!(opts.timeout, Some(Duration::from_millis(250)));
    }
}
