//! The process runner.
//!
//! Executes a pipeline of one or more chained child processes and reports a
//! structured [`ExecutionResult`]:
//!
//! - Stage *i*'s stdout feeds stage *i + 1*'s stdin
//! - Output and error are captured in memory (or redirected to files),
//!   optionally echoed live, then decoded and normalized
//! - One timeout covers the whole pipeline
//! - Child failures (non-zero exit, signals, launch errors, timeouts) are
//!   data in the result, never an `Err`
//!
//! ```no_run
//! use execproc::process::{ExecutionOptions, Runner};
//!
//! let mut runner = Runner::new();
//! runner.add_stage(["echo", "hello"])?;
//! runner.configure(ExecutionOptions::default().with_strip_output(true));
//! let result = runner.run()?;
//! assert_eq!(result.output, "hello");
//! # Ok::<(), execproc::error::ExecError>(())
//! ```

mod capture;
mod job;
mod options;
mod pipeline;
mod result;
mod status;


pub use options::{ExecutionOptions, parse_timeout, parse_timeout_secs};
pub use pipeline::CommandPipeline;
pub use result::{ExecutionResult, ResultSummary};
pub use status::{JobState, StageState, TIMEOUT_MESSAGE};

use crate::error::Result;
use crate::text::{TextDecoder, decode_all, normalize_text, resolve_decoder};
use capture::{Capture, Poll, Stream};
use job::Job;
use std::io::Write;
use std::time::Instant;

/// Runs command pipelines.
///
/// A runner owns its options and the most recent result. Stages are appended
/// before a run and consumed by it; append again to run another pipeline.
pub struct Runner {
    pipeline: CommandPipeline,
    options: ExecutionOptions,
    result: Option<ExecutionResult>,
    echo_out: Box<dyn Write + Send>,
    echo_err: Box<dyn Write + Send>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            pipeline: CommandPipeline::new(),
            options: ExecutionOptions::default(),
            result: None,
            echo_out: Box::new(std::io::stdout()),
            echo_err: Box::new(std::io::stderr()),
        }
    }

    /// Create a runner with one stage already appended.
    pub fn with_command<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut runner = Self::new();
        runner.add_stage(args)?;
        Ok(runner)
    }

    /// Replace the sinks that live output and errors are echoed to.
    pub fn with_echo(
        mut self,
        stdout: impl Write + Send + 'static,
        stderr: impl Write + Send + 'static,
    ) -> Self {
        self.echo_out = Box::new(stdout);
        self.echo_err = Box::new(stderr);
        self
    }

    /// Append one stage to the pipeline.
    pub fn add_stage<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pipeline.push(args)
    }

    /// Replace the whole pipeline.
    pub fn set_pipeline(&mut self, pipeline: CommandPipeline) {
        self.pipeline = pipeline;
    }

    pub fn clear_stages(&mut self) {
        self.pipeline.clear();
    }

    pub fn pipeline(&self) -> &CommandPipeline {
        &self.pipeline
    }

    pub fn configure(&mut self, options: ExecutionOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ExecutionOptions {
        &mut self.options
    }

    /// Result of the most recent run.
    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn command_string(&self) -> String {
        self.pipeline.command_string()
    }

    /// Append a stage, then run.
    pub fn run_with<I, S>(&mut self, args: I) -> Result<&ExecutionResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_stage(args)?;
        self.run()
    }

    /// Execute the pipeline and wait for it to finish.
    ///
    /// Fails only when the pipeline is malformed, in which case nothing is
    /// launched and the stages are kept. Otherwise the stages are consumed and
    /// the returned result describes how the children ended.
    pub fn run(&mut self) -> Result<&ExecutionResult> {
        self.pipeline.validate()?;
        let pipeline = std::mem::take(&mut self.pipeline);
        let command = pipeline.command_string();
        let options = &self.options;

        let start = Instant::now();
        let timeout = options.effective_timeout();
        let deadline = timeout.map(|timeout| start + timeout);

        let mut job = match Job::launch(&pipeline, options) {
            Ok(job) => job,
            Err(msg) => {
                let result = ExecutionResult::new(
                    command,
                    String::new(),
                    String::new(),
                    JobState::LaunchError(msg),
                    Vec::new(),
                    start.elapsed(),
                );
                return Ok(&*self.result.insert(result));
            }
        };

        let mut capture = Capture::start(job.take_stdout(), job.take_stderr());
        let mut out_decoder = resolve_decoder(options.encoding);
        let mut err_decoder = resolve_decoder(options.encoding);
        let mut output = Vec::new();
        let mut error = Vec::new();

        let timed_out = loop {
            match capture.wait_for_data(deadline) {
                Poll::Data(Stream::Output, chunk) => {
                    echo(
                        out_decoder.as_mut(),
                        &chunk,
                        options.output_quiet,
                        &mut self.echo_out,
                    );
                    output.extend_from_slice(&chunk);
                }
                Poll::Data(Stream::Error, chunk) => {
                    echo(
                        err_decoder.as_mut(),
                        &chunk,
                        options.error_quiet,
                        &mut self.echo_err,
                    );
                    error.extend_from_slice(&chunk);
                }
                Poll::Drained => break false,
                Poll::TimedOut => break true,
            }
        };

        let reaped = if timed_out {
            tracing::warn!(timeout = ?timeout, "pipeline timed out; killing");
            job.kill();
            job.reap(None)
        } else {
            job.reap(deadline)
        };
        drop(job);

        let state = if timed_out || reaped.timed_out {
            JobState::TimedOut
        } else {
            JobState::from_stages(&reaped.stages)
        };
        tracing::debug!(result = %state.describe(), stages = reaped.stages.len(), "pipeline finished");

        let output = normalize_text(decode_all(options.encoding, &output), options.strip_output);
        let error = normalize_text(decode_all(options.encoding, &error), options.strip_error);

        let result = ExecutionResult::new(
            command,
            output,
            error,
            state,
            reaped.stages,
            start.elapsed(),
        );
        Ok(&*self.result.insert(result))
    }
}

/// Decode a chunk and echo it unless quiet.
fn echo(decoder: &mut dyn TextDecoder, chunk: &[u8], quiet: bool, sink: &mut dyn Write) {
    let text = decoder.decode(chunk);
    if quiet || text.is_empty() {
        return;
    }
    let _ = sink.write_all(text.as_bytes());
    let _ = sink.flush();
}
