//! Implementation of the `execproc run` command.
//!
//! Builds a runner from the job file and flags, runs the pipeline, and
//! reports the outcome.

use super::load_pipeline;
use crate::cli::RunArgs;
use execproc::error::{ExecError, Result};
use execproc::events::{RunRecord, append_record};
use execproc::process::{ExecutionOptions, ExecutionResult, Runner, parse_timeout};
use execproc::text::Encoding;

/// Execute the `execproc run` command.
///
/// Child failures only affect the exit code when `--check` is given.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let mut runner = build_runner(&args)?;
    let options = runner.options().clone();

    let result = runner.run()?;

    if args.json {
        print_json(result)?;
    } else {
        let (out, err) = text_report(result, &options);
        print!("{}", out);
        eprint!("{}", err);
    }

    if let Some(log) = &args.log {
        let record = RunRecord::from_result(result, options.working_directory.as_deref());
        append_record(log, &record)?;
    }

    if args.check {
        result.check()?;
    }

    Ok(())
}

/// Assemble a runner: job file first, then command-line overrides.
pub(crate) fn build_runner(args: &RunArgs) -> Result<Runner> {
    let (job, pipeline) = load_pipeline(&args.pipeline)?;
    let options = apply_overrides(job.to_options()?, args)?;

    let mut runner = Runner::new();
    runner.set_pipeline(pipeline);
    runner.configure(options);
    Ok(runner)
}

fn apply_overrides(mut options: ExecutionOptions, args: &RunArgs) -> Result<ExecutionOptions> {
    if let Some(dir) = &args.working_directory {
        options = options.with_working_directory(dir);
    }
    if let Some(timeout) = &args.timeout {
        options.timeout = parse_timeout(timeout)?;
    }
    if let Some(path) = &args.input_file {
        options = options.with_input_file(path);
    }
    if let Some(path) = &args.output_file {
        options = options.with_output_file(path);
    }
    if let Some(path) = &args.error_file {
        options = options.with_error_file(path);
    }
    if let Some(quiet) = args.output_quiet {
        options.output_quiet = quiet;
    }
    if let Some(quiet) = args.error_quiet {
        options.error_quiet = quiet;
    }
    if let Some(strip) = args.strip_output {
        options.strip_output = strip;
    }
    if let Some(strip) = args.strip_error {
        options.strip_error = strip;
    }
    if args.merge_output {
        options.merge_output = true;
    }
    if let Some(name) = &args.encoding {
        options.encoding = Encoding::from_str(name).ok_or_else(|| {
            ExecError::InvalidArgument(format!(
                "unknown encoding '{}'. Valid encodings: none, auto, utf8, ansi, oem",
                name
            ))
        })?;
    }
    Ok(options)
}

/// Text for stdout and stderr: the status lines, then whatever was captured
/// but not already echoed live.
fn text_report(result: &ExecutionResult, options: &ExecutionOptions) -> (String, String) {
    let mut out = format!("Result:  {}\nResults: {}\n", result.result, result.results);
    let mut err = String::new();

    if options.output_quiet {
        push_line(&mut out, &result.output);
    }
    if options.error_quiet {
        push_line(&mut err, &result.error);
    }
    (out, err)
}

fn push_line(buf: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    buf.push_str(text);
    if !text.ends_with('\n') {
        buf.push('\n');
    }
}

fn print_json(result: &ExecutionResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.summary())
        .map_err(|e| ExecError::UserError(format!("failed to serialize result: {}", e)))?;
    println!("{}", json);
    Ok(())
}
