/// Parser for `llvm-cov export --format=text` JSON.
///
/// Only the per-file segment lists are used:
///
///   { "type": "llvm.coverage.json.export",
///     "data": [ { "files": [ { "filename": "/abs/File.swift",
///                              "segments": [[1, 1, 5, true, true, false], ...] } ] } ] }
///
/// A segment is `[line, column, count, hasCount, isRegionEntry, isGapRegion?]`.
/// Older exporters emit the flags as 0/1 integers, newer ones as booleans.
/// A malformed tuple decodes to the all-zero segment instead of failing the
/// whole file; the index ignores it since it has no count.
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CrapError, Result};
use crate::model::Segment;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlvmCovExport {
    pub data: Vec<DataEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(segment_from_value(&value))
    }
}

fn segment_from_value(value: &Value) -> Segment {
    let fields = match value.as_array() {
        Some(arr) if arr.len() >= 5 => arr,
        _ => return Segment::default(),
    };

    Segment {
        line: u32::try_from(int_value(&fields[0])).unwrap_or(0),
        column: u32::try_from(int_value(&fields[1])).unwrap_or(0),
        count: int_value(&fields[2]),
        has_count: int_value(&fields[3]) != 0,
        is_region_entry: int_value(&fields[4]) != 0,
    }
}

/// Integers and booleans both decode; anything else (including negative
/// numbers) is zero.
fn int_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::Bool(b) => u64::from(*b),
        _ => 0,
    }
}

/// Decode an llvm-cov export. Any schema mismatch outside the segment
/// tuples is fatal.
pub fn parse(input: &[u8]) -> Result<LlvmCovExport> {
    serde_json::from_slice(input)
        .map_err(|e| CrapError::Decode(format!("invalid llvm-cov export: {e}")))
}
