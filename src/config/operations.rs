//! Job file loading, validation, and conversion into runner inputs.

use super::model::JobConfig;
use crate::error::{ExecError, Result};
use crate::process::{CommandPipeline, ExecutionOptions, parse_timeout};
use std::path::Path;

impl JobConfig {
    /// Load a job file from disk.
    ///
    /// # Returns
    ///
    /// * `Ok(JobConfig)` - Successfully loaded and validated job
    /// * `Err(ExecError::UserError)` - The file could not be read or parsed
    /// * `Err(ExecError::InvalidArgument)` - An option value is invalid
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ExecError::UserError(format!(
                "failed to read job file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a job from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let job: JobConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ExecError::UserError(format!("failed to parse job YAML: {}", e)))?;

        job.validate()?;
        Ok(job)
    }

    /// Serialize the job to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ExecError::UserError(format!("failed to serialize job to YAML: {}", e)))
    }

    /// Validate option values.
    ///
    /// The pipeline itself is checked when it runs, since command-line stages
    /// may still be appended.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = &self.timeout {
            parse_timeout(&timeout.as_text())?;
        }
        Ok(())
    }

    /// The stages as a pipeline.
    pub fn pipeline(&self) -> CommandPipeline {
        CommandPipeline::from(self.commands.clone())
    }

    /// Execution options described by this job.
    pub fn to_options(&self) -> Result<ExecutionOptions> {
        let timeout = match &self.timeout {
            Some(timeout) => parse_timeout(&timeout.as_text())?,
            None => None,
        };

        let mut options = ExecutionOptions::default()
            .with_working_directory(&self.working_directory)
            .with_input_file(&self.input_file)
            .with_output_file(&self.output_file)
            .with_error_file(&self.error_file)
            .with_output_quiet(self.output_quiet)
            .with_error_quiet(self.error_quiet)
            .with_strip_output(self.output_strip_trailing_whitespace)
            .with_strip_error(self.error_strip_trailing_whitespace)
            .with_merge_output(self.merge_output)
            .with_encoding(self.encoding);
        options.timeout = timeout;

        Ok(options)
    }
}
