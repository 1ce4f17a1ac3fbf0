//! CLI argument parsing for execproc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// execproc: run a command pipeline, capture its output, and report how
/// every stage ended.
///
/// Stages are chained stdout -> stdin. A timeout applies to the whole
/// pipeline. Child failures are reported, not treated as errors, unless
/// `--check` is given.
#[derive(Parser, Debug)]
#[command(name = "execproc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for execproc.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a pipeline.
    ///
    /// Stages come from the job file (if any) followed by every `--command`.
    Run(RunArgs),

    /// Print the pipeline that would run, one stage per line.
    Show(ShowArgs),

    /// Show recent entries of a run log.
    History(HistoryArgs),
}

/// Where the pipeline stages come from.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// One pipeline stage, split with shell quoting rules. Repeat for more stages.
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// YAML job file describing stages and options.
    #[arg(long, value_name = "FILE")]
    pub job: Option<PathBuf>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Working directory for every stage.
    #[arg(long, value_name = "DIR")]
    pub working_directory: Option<PathBuf>,

    /// Timeout in seconds for the whole pipeline (fractions allowed).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<String>,

    /// File fed to the first stage's standard input.
    #[arg(long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// File receiving the last stage's standard output.
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// File receiving standard error (same as --output-file merges the streams).
    #[arg(long, value_name = "FILE")]
    pub error_file: Option<PathBuf>,

    /// Do not echo captured output.
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub output_quiet: Option<bool>,

    /// Do not echo captured errors.
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub error_quiet: Option<bool>,

    /// Strip trailing whitespace from captured output.
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub strip_output: Option<bool>,

    /// Strip trailing whitespace from captured errors.
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub strip_error: Option<bool>,

    /// Merge standard error into standard output.
    #[arg(long)]
    pub merge_output: bool,

    /// Encoding of the children's output (none, auto, utf8, ansi, oem).
    #[arg(long, value_name = "NAME")]
    pub encoding: Option<String>,

    /// Exit with a failure code and a report unless the pipeline succeeded.
    #[arg(long)]
    pub check: bool,

    /// Print the result as JSON, including captured output and error.
    #[arg(long)]
    pub json: bool,

    /// Append a record of the run to this NDJSON file.
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the `history` command.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Run log to read.
    pub log: PathBuf,

    /// Show only the last N runs (0 shows all).
    #[arg(long, default_value_t = 10)]
    pub tail: usize,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
