//! JSON-lines action log, one entry per processed file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub action: String,
    pub input: String,
    pub output: String,
    pub input_bytes: Option<u64>,
    pub output_bytes: Option<u64>,
    pub outcome: String,
}

impl LogEntry {
    /// A successful operation with its byte counts.
    pub fn success(action: &str, input: &Path, output: &Path, input_bytes: u64, output_bytes: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            input: input.display().to_string(),
            output: output.display().to_string(),
            input_bytes: Some(input_bytes),
            output_bytes: Some(output_bytes),
            outcome: "ok".to_string(),
        }
    }

    /// A failed operation; `outcome` carries the error text.
    pub fn failure(action: &str, input: &Path, output: &Path, error: &dyn std::fmt::Display) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            input: input.display().to_string(),
            output: output.display().to_string(),
            input_bytes: None,
            output_bytes: None,
            outcome: error.to_string(),
        }
    }
}

/// Appends `entry` to the log at `path`, creating the file if needed.
pub fn append(path: &Path, entry: &LogEntry) -> io::Result<()> {
    let json = serde_json::to_string(entry).map_err(io::Error::other)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{json}")
}
