//! Tests for job file handling.

use crate::config::{JobConfig, TimeoutValue};
use crate::error::ExecError;
use crate::text::Encoding;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_job() {
    let job = JobConfig::default();

    assert!(job.commands.is_empty());
    assert!(job.working_directory.is_empty());
    assert!(job.timeout.is_none());
    assert!(job.output_quiet);
    assert!(!job.error_quiet);
    assert!(!job.output_strip_trailing_whitespace);
    assert!(job.error_strip_trailing_whitespace);
    assert!(!job.merge_output);
    assert_eq!(job.encoding, Encoding::None);
}

#[test]
fn test_parse_minimal_yaml() {
    let job = JobConfig::from_yaml("").unwrap();
    assert_eq!(job, JobConfig::default());
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
commands:
  - ["printf", "b\na\n"]
  - ["sort"]
working_directory: /tmp
timeout: 2.5
input_file: in.txt
output_file: out.txt
error_file: out.txt
output_quiet: false
error_quiet: true
output_strip_trailing_whitespace: true
error_strip_trailing_whitespace: false
encoding: utf8
"#;
    let job = JobConfig::from_yaml(yaml).unwrap();

    assert_eq!(job.commands.len(), 2);
    assert_eq!(job.commands[1], vec!["sort".to_string()]);
    assert_eq!(job.timeout, Some(TimeoutValue::Seconds(2.5)));
    assert_eq!(job.encoding, Encoding::Utf8);

    let options = job.to_options().unwrap();
    assert_eq!(options.working_directory, Some(PathBuf::from("/tmp")));
    assert_eq!(options.timeout, Some(Duration::from_millis(2500)));
    assert_eq!(options.input_file, Some(PathBuf::from("in.txt")));
    assert!(options.merges_output());
    assert!(!options.output_quiet);
    assert!(options.error_quiet);
    assert!(options.strip_output);
    assert!(!options.strip_error);
}

#[test]
fn test_timeout_as_string() {
    let job = JobConfig::from_yaml("timeout: \"0.5\"").unwrap();
    assert_eq!(job.timeout, Some(TimeoutValue::Text("0.5".to_string())));
    assert_eq!(
        job.to_options().unwrap().timeout,
        Some(Duration::from_millis(500))
    );
}

#[test]
fn test_invalid_timeout_rejected() {
    let err = JobConfig::from_yaml("timeout: soon").unwrap_err();
    assert!(matches!(err, ExecError::InvalidArgument(_)));

    let err = JobConfig::from_yaml("timeout: -3").unwrap_err();
    assert!(matches!(err, ExecError::InvalidArgument(_)));
}

#[test]
fn test_unknown_fields_ignored() {
    let job = JobConfig::from_yaml("future_option: 1\ncommands: [[\"true\"]]").unwrap();
    assert_eq!(job.commands, vec![vec!["true".to_string()]]);
}

#[test]
fn test_invalid_yaml_is_user_error() {
    let err = JobConfig::from_yaml("commands: [unterminated").unwrap_err();
    assert!(matches!(err, ExecError::UserError(_)));
    assert!(err.to_string().contains("failed to parse job YAML"));
}

#[test]
fn test_invalid_encoding_rejected() {
    assert!(JobConfig::from_yaml("encoding: ebcdic").is_err());
}

#[test]
fn test_empty_paths_are_unset() {
    let options = JobConfig::default().to_options().unwrap();
    assert!(options.working_directory.is_none());
    assert!(options.output_file.is_none());
    assert!(!options.merges_output());
}

#[test]
fn test_yaml_roundtrip() {
    let job = JobConfig {
        commands: vec![vec!["echo".to_string(), "hi".to_string()]],
        timeout: Some(TimeoutValue::Seconds(1.0)),
        encoding: Encoding::Auto,
        ..Default::default()
    };
    let parsed = JobConfig::from_yaml(&job.to_yaml().unwrap()).unwrap();
    assert_eq!(parsed, job);
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("job.yaml");
    std::fs::write(&path, "commands:\n  - [echo, hi]\n").unwrap();

    let job = JobConfig::load(&path).unwrap();
    assert_eq!(job.pipeline().command_string(), "0 : \"echo hi\"");

    let err = JobConfig::load(temp.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read job file"));
}
