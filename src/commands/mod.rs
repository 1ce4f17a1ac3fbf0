//! Command implementations for execproc.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the pipeline assembly they share.

mod history;
mod run;

use crate::cli::{Command, PipelineArgs, ShowArgs};
use execproc::config::JobConfig;
use execproc::error::{ExecError, Result};
use execproc::process::CommandPipeline;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Show(args) => cmd_show(args),
        Command::History(args) => history::cmd_history(args),
    }
}

fn cmd_show(args: ShowArgs) -> Result<()> {
    let (_, pipeline) = load_pipeline(&args.pipeline)?;
    pipeline.validate()?;
    println!("{}", pipeline.command_string());
    Ok(())
}

/// Load the job file (if any) and append the `--command` stages.
pub(crate) fn load_pipeline(args: &PipelineArgs) -> Result<(JobConfig, CommandPipeline)> {
    let job = match &args.job {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };

    let mut pipeline = job.pipeline();
    for command in &args.commands {
        pipeline.push(split_command(command)?)?;
    }

    Ok((job, pipeline))
}

/// Split one `--command` value into an argument vector.
fn split_command(command: &str) -> Result<Vec<String>> {
    let args = shell_words::split(command).map_err(|e| {
        ExecError::UserError(format!(
            "failed to parse command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            command, e
        ))
    })?;

    if args.is_empty() {
        return Err(ExecError::InvalidArgument(format!(
            "command is empty after parsing: '{}'",
            command
        )));
    }

    Ok(args)
}
