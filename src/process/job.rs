//! Launching a pipeline as one OS-level job and reaping it.
//!
//! All stages start back to back with stage *i*'s stdout connected to stage
//! *i + 1*'s stdin. Captured streams go through anonymous pipes whose read
//! ends are handed to the capture loop. When a timeout is configured on Unix
//! the stages share a fresh process group so a timeout can kill everything
//! the pipeline spawned, not just the direct children.

use super::options::ExecutionOptions;
use super::pipeline::CommandPipeline;
use super::status::{StageState, UNKNOWN_STATUS_MESSAGE};
use std::fs::File;
use std::io::{self, PipeReader, PipeWriter};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

/// How often the reaper re-checks children while a deadline is pending.
const REAP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where a stream of the child ends up.
enum Sink {
    File(File),
    Pipe(PipeWriter),
}

impl Sink {
    fn stdio(&self) -> io::Result<Stdio> {
        match self {
            Sink::File(file) => file.try_clone().map(Stdio::from),
            Sink::Pipe(writer) => writer.try_clone().map(Stdio::from),
        }
    }
}

/// A running pipeline.
pub(crate) struct Job {
    children: Vec<Child>,
    stdout: Option<PipeReader>,
    stderr: Option<PipeReader>,
    process_group: Option<i32>,
}

/// Outcome of reaping a job.
pub(crate) struct Reaped {
    pub(crate) stages: Vec<StageState>,
    pub(crate) timed_out: bool,
}

impl Job {
    /// Start every stage of `pipeline`.
    ///
    /// On failure, stages that already started are killed and reaped, and the
    /// error text describes what could not be launched.
    pub(crate) fn launch(
        pipeline: &CommandPipeline,
        options: &ExecutionOptions,
    ) -> Result<Job, String> {
        let mut job = Job {
            children: Vec::with_capacity(pipeline.len()),
            stdout: None,
            stderr: None,
            process_group: None,
        };

        if let Err(msg) = job.spawn_stages(pipeline, options) {
            tracing::warn!(error = %msg, "pipeline launch failed");
            job.kill();
            job.reap(None);
            return Err(msg);
        }

        Ok(job)
    }

    fn spawn_stages(
        &mut self,
        pipeline: &CommandPipeline,
        options: &ExecutionOptions,
    ) -> Result<(), String> {
        if let Some(dir) = &options.working_directory
            && !dir.is_dir()
        {
            return Err(format!(
                "Error changing to working directory '{}': no such directory",
                dir.display()
            ));
        }

        let mut stdin_file = match &options.input_file {
            Some(path) => Some(File::open(path).map_err(|e| file_error("input", path, e))?),
            None => None,
        };

        let stdout_sink = match &options.output_file {
            Some(path) => Sink::File(File::create(path).map_err(|e| file_error("output", path, e))?),
            None => {
                let (reader, writer) = io::pipe().map_err(pipe_error)?;
                self.stdout = Some(reader);
                Sink::Pipe(writer)
            }
        };

        let stderr_sink = if options.merges_output() {
            None
        } else {
            match &options.error_file {
                Some(path) => Some(Sink::File(
                    File::create(path).map_err(|e| file_error("error", path, e))?,
                )),
                None => {
                    let (reader, writer) = io::pipe().map_err(pipe_error)?;
                    self.stderr = Some(reader);
                    Some(Sink::Pipe(writer))
                }
            }
        };
        let stderr_sink = stderr_sink.as_ref().unwrap_or(&stdout_sink);

        let use_process_group = cfg!(unix) && options.effective_timeout().is_some();
        let last = pipeline.len().saturating_sub(1);
        let mut previous_stdout: Option<ChildStdout> = None;

        for (index, args) in pipeline.stages().iter().enumerate() {
            let program = &args[0];
            let mut command = Command::new(program);
            command.args(&args[1..]);

            if let Some(dir) = &options.working_directory {
                command.current_dir(dir);
            }

            let stdin = match (previous_stdout.take(), stdin_file.take()) {
                (Some(upstream), _) => Stdio::from(upstream),
                (None, Some(file)) => Stdio::from(file),
                (None, None) => Stdio::inherit(),
            };
            command.stdin(stdin);

            if index == last {
                command.stdout(stdout_sink.stdio().map_err(pipe_error)?);
            } else {
                command.stdout(Stdio::piped());
            }
            command.stderr(stderr_sink.stdio().map_err(pipe_error)?);

            if use_process_group {
                join_process_group(&mut command, self.process_group);
            }

            let mut child = command
                .spawn()
                .map_err(|e| format!("failed to execute '{}': {}", program, e))?;

            tracing::debug!(stage = index, pid = child.id(), program = %program, "stage started");

            if use_process_group && self.process_group.is_none() {
                self.process_group = i32::try_from(child.id()).ok();
            }
            if index != last {
                previous_stdout = child.stdout.take();
            }
            self.children.push(child);
        }

        // `stdout_sink` and `stderr_sink` drop here, so the read ends see EOF
        // once the last child closes its copy.
        Ok(())
    }

    pub(crate) fn take_stdout(&mut self) -> Option<PipeReader> {
        self.stdout.take()
    }

    pub(crate) fn take_stderr(&mut self) -> Option<PipeReader> {
        self.stderr.take()
    }

    /// Forcibly terminate every stage.
    pub(crate) fn kill(&mut self) {
        if let Some(pgid) = self.process_group {
            kill_process_group(pgid);
        }

        for child in &mut self.children {
            // On Unix this is SIGKILL; on Windows it is TerminateProcess.
            let _ = child.kill();
        }
    }

    /// Wait for every stage to terminate.
    ///
    /// With a deadline, stages still running when it passes are killed and
    /// the outcome is marked as timed out.
    pub(crate) fn reap(&mut self, deadline: Option<Instant>) -> Reaped {
        let mut timed_out = false;

        if let Some(deadline) = deadline {
            loop {
                let running = self
                    .children
                    .iter_mut()
                    .any(|child| matches!(child.try_wait(), Ok(None)));
                if !running {
                    break;
                }
                if Instant::now() >= deadline {
                    tracing::warn!("pipeline timed out while waiting for exit; killing");
                    self.kill();
                    timed_out = true;
                    break;
                }
                std::thread::sleep(REAP_POLL_INTERVAL);
            }
        }

        let stages = self
            .children
            .iter_mut()
            .map(|child| match child.wait() {
                Ok(status) => StageState::from_exit_status(status),
                Err(_) => StageState::Error(UNKNOWN_STATUS_MESSAGE.to_string()),
            })
            .collect();

        Reaped { stages, timed_out }
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        let running = self
            .children
            .iter_mut()
            .any(|child| matches!(child.try_wait(), Ok(None)));
        if running {
            self.kill();
            for child in &mut self.children {
                let _ = child.wait();
            }
        }
    }
}

/// Put the stage into `group`, or into a new group led by itself.
#[cfg(unix)]
fn join_process_group(command: &mut Command, group: Option<i32>) {
    use std::os::unix::process::CommandExt;
    command.process_group(group.unwrap_or(0));
}

#[cfg(not(unix))]
fn join_process_group(_command: &mut Command, _group: Option<i32>) {}

#[cfg(unix)]
fn kill_process_group(pgid: i32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;
    let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: i32) {}

fn file_error(which: &str, path: &Path, e: io::Error) -> String {
    format!("Error opening {} file '{}': {}", which, path.display(), e)
}

fn pipe_error(e: io::Error) -> String {
    format!("Error creating pipe: {}", e)
}
