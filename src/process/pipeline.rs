//! Command pipeline model.

use crate::error::{ExecError, Result};

/// An ordered sequence of stages, each an argument vector whose first entry
/// is the program.
///
/// Stage *i*'s standard output feeds stage *i + 1*'s standard input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPipeline {
    stages: Vec<Vec<String>>,
}

impl CommandPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stage. An empty argument list is rejected.
    pub fn push<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(ExecError::InvalidArgument(
                "given COMMAND argument with no value.".to_string(),
            ));
        }
        self.stages.push(args);
        Ok(())
    }

    /// Check that there is at least one stage and that no stage is empty.
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(ExecError::InvalidArgument(
                "called with no COMMAND argument.".to_string(),
            ));
        }
        if self.stages.iter().any(Vec::is_empty) {
            return Err(ExecError::InvalidArgument(
                "given COMMAND argument with no value.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    /// Human-readable listing: one `<index> : "<args>"` line per stage.
    pub fn command_string(&self) -> String {
        self.stages
            .iter()
            .enumerate()
            .map(|(i, args)| format!("{} : \"{}\"", i, args.join(" ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build a pipeline without validating it; [`CommandPipeline::validate`]
/// runs before execution.
impl From<Vec<Vec<String>>> for CommandPipeline {
    fn from(stages: Vec<Vec<String>>) -> Self {
        Self { stages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_empty_stage() {
        let mut pipeline = CommandPipeline::new();
        let err = pipeline.push(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ExecError::InvalidArgument(_)));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn validate_empty_pipeline() {
        let err = CommandPipeline::new().validate().unwrap_err();
        assert_eq!(err.to_string(), "called with no COMMAND argument.");
    }

    #[test]
    fn validate_catches_empty_stage_from_vec() {
        let pipeline = CommandPipeline::from(vec![vec!["echo".to_string()], vec![]]);
        let err = pipeline.validate().unwrap_err();
        assert_eq!(err.to_string(), "given COMMAND argument with no value.");
    }

    #[test]
    fn command_string_lists_stages() {
        let mut pipeline = CommandPipeline::new();
        pipeline.push(["echo", "hello", "world"]).unwrap();
        pipeline.push(["tr", "a-z", "A-Z"]).unwrap();
        assert_eq!(
            pipeline.command_string(),
            "0 : \"echo hello world\"\n1 : \"tr a-z A-Z\""
        );
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn clear_resets() {
        let mut pipeline = CommandPipeline::new();
        pipeline.push(["true"]).unwrap();
        pipeline.clear();
        assert!(pipeline.validate().is_err());
    }
}
