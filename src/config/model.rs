//! JobConfig struct definition and default implementation.

use super::types::*;
use crate::text::Encoding;
use serde::{Deserialize, Serialize};

/// A pipeline plus the options to run it with.
///
/// Empty strings mean "not set" for every path field. Unknown fields in the
/// YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Pipeline stages, each an argument vector.
    pub commands: Vec<Vec<String>>,

    /// Working directory for every stage (empty = current directory).
    pub working_directory: String,

    /// Timeout in seconds, as a number or numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutValue>,

    /// File fed to the first stage's standard input.
    pub input_file: String,

    /// File receiving the last stage's standard output.
    pub output_file: String,

    /// File receiving standard error. Equal to `output_file` merges the streams.
    pub error_file: String,

    /// Do not echo captured output (default: true).
    #[serde(default = "default_true")]
    pub output_quiet: bool,

    /// Do not echo captured errors (default: false).
    pub error_quiet: bool,

    /// Strip trailing whitespace from captured output (default: false).
    pub output_strip_trailing_whitespace: bool,

    /// Strip trailing whitespace from captured errors (default: true).
    #[serde(default = "default_true")]
    pub error_strip_trailing_whitespace: bool,

    /// Merge standard error into standard output without naming files.
    pub merge_output: bool,

    /// Encoding of the children's output.
    pub encoding: Encoding,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            working_directory: String::new(),
            timeout: None,
            input_file: String::new(),
            output_file: String::new(),
            error_file: String::new(),
            output_quiet: default_true(),
            error_quiet: false,
            output_strip_trailing_whitespace: false,
            error_strip_trailing_whitespace: default_true(),
            merge_output: false,
            encoding: Encoding::default(),
        }
    }
}
