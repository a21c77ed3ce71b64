/// Parser for the JSON report printed by `xcrun xccov view --report --json`.
///
/// Shape (unknown keys are ignored):
///
///   { "targets": [ { "files": [ {
///       "path": "/abs/File.swift",
///       "lineCoverage": 0.5,
///       "functions": [ { "name": "f()", "lineCoverage": 0.8,
///                        "lineNumber": 10, "executionCount": 3 } ]
///   } ] } ] }
///
/// Coverage values are fractions in 0..1; the index scales them to percent.
use serde::Deserialize;

use crate::error::{CrapError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XccovReport {
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    pub line_coverage: f64,
    #[serde(default)]
    pub functions: Option<Vec<FunctionRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    pub name: String,
    pub line_coverage: f64,
    pub line_number: u32,
    #[serde(default)]
    pub execution_count: u64,
}

/// Decode an xccov report. Any schema mismatch is fatal.
pub fn parse(input: &[u8]) -> Result<XccovReport> {
    serde_json::from_slice(input)
        .map_err(|e| CrapError::Decode(format!("invalid xccov report: {e}")))
}
