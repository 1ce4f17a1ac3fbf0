//! Terminal states of a pipeline and of its individual stages.

use std::process::ExitStatus;

/// Reported for the whole pipeline when the timeout expired.
pub const TIMEOUT_MESSAGE: &str = "Process terminated due to timeout";

/// Reported for a stage whose exit status could not be interpreted.
pub const UNKNOWN_STATUS_MESSAGE: &str = "Error getting the child return code";

/// How one stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState {
    /// Exited normally with this code.
    Exited(i32),
    /// Terminated abnormally (e.g. by a signal).
    Exception(String),
    /// The exit status could not be determined.
    Error(String),
}

impl StageState {
    /// Classify an OS exit status.
    pub fn from_exit_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return StageState::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return StageState::Exception(signal_description(signal));
            }
        }

        StageState::Error(UNKNOWN_STATUS_MESSAGE.to_string())
    }

    pub fn describe(&self) -> String {
        match self {
            StageState::Exited(code) => code.to_string(),
            StageState::Exception(msg) | StageState::Error(msg) => msg.clone(),
        }
    }
}

/// How the pipeline as a whole ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// The last stage exited normally with this code.
    Exited(i32),
    /// The last stage terminated abnormally.
    Exception(String),
    /// The pipeline could not be started.
    LaunchError(String),
    /// The pipeline was killed after the timeout expired.
    TimedOut,
}

impl JobState {
    /// Overall state derived from the stages; the last stage decides.
    pub fn from_stages(stages: &[StageState]) -> Self {
        match stages.last() {
            Some(StageState::Exited(code)) => JobState::Exited(*code),
            Some(StageState::Exception(msg)) => JobState::Exception(msg.clone()),
            Some(StageState::Error(msg)) => JobState::LaunchError(msg.clone()),
            None => JobState::LaunchError(UNKNOWN_STATUS_MESSAGE.to_string()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            JobState::Exited(code) => code.to_string(),
            JobState::Exception(msg) | JobState::LaunchError(msg) => msg.clone(),
            JobState::TimedOut => TIMEOUT_MESSAGE.to_string(),
        }
    }

    /// Per-stage status text: one `;`-joined entry per stage when the job
    /// exited, otherwise the job's own description.
    pub fn describe_stages(&self, stages: &[StageState]) -> String {
        match self {
            JobState::Exited(_) => stages
                .iter()
                .map(StageState::describe)
                .collect::<Vec<_>>()
                .join(";"),
            other => other.describe(),
        }
    }
}

/// Descriptive text for a terminating signal.
#[cfg(unix)]
pub fn signal_description(signal: i32) -> String {
    use nix::sys::signal::Signal;

    let text = match Signal::try_from(signal) {
        Ok(Signal::SIGSEGV) => "Segmentation fault",
        Ok(Signal::SIGBUS) => "Bus error",
        Ok(Signal::SIGFPE) => "Floating-point exception",
        Ok(Signal::SIGILL) => "Illegal instruction",
        Ok(Signal::SIGINT) => "User interrupt",
        Ok(Signal::SIGABRT) => "Child aborted",
        Ok(Signal::SIGKILL) => "Child killed",
        Ok(Signal::SIGTERM) => "Child terminated",
        Ok(Signal::SIGHUP) => "SIGHUP",
        Ok(Signal::SIGQUIT) => "SIGQUIT",
        Ok(Signal::SIGTRAP) => "SIGTRAP",
        Ok(Signal::SIGPIPE) => "SIGPIPE",
        Ok(Signal::SIGALRM) => "SIGALRM",
        Ok(Signal::SIGUSR1) => "SIGUSR1",
        Ok(Signal::SIGUSR2) => "SIGUSR2",
        _ => return format!("Signal {}", signal),
    };
    text.to_string()
}
