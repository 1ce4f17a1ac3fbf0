//! Job file model for execproc.
//!
//! A job file is a YAML description of a pipeline and its execution options.
//! It supports forward-compatible parsing (unknown fields are ignored),
//! defaults for every field, and validation of option values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::JobConfig;
pub use types::TimeoutValue;
