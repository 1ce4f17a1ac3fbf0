//! execproc: run command pipelines with output capture, timeouts, and
//! structured exit status.
//!
//! The [`process::Runner`] is the heart of the crate. The remaining modules
//! carry what the `execproc` binary needs around it: job files, a run log,
//! and error/exit-code mapping.

pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod logging;
pub mod process;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;
