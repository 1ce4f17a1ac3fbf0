//! Value types and defaults used by the job file.

use serde::{Deserialize, Serialize};

/// A timeout as written in a job file: either a number of seconds or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeoutValue {
    Seconds(f64),
    Text(String),
}

impl TimeoutValue {
    pub fn as_text(&self) -> String {
        match self {
            TimeoutValue::Seconds(secs) => secs.to_string(),
            TimeoutValue::Text(text) => text.clone(),
        }
    }
}

pub fn default_true() -> bool {
    true
}
