//! Records exchanged at the crate boundary: code units coming in from the
//! complexity analyzer, risk entries going out to the report, and the
//! decoded coverage segment shared by the llvm-cov parser and index.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Compute a percentage, returning 0.0 when the total is zero.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// Scale a raw 0..1 coverage fraction to a percentage clamped to [0, 100].
#[must_use]
pub fn fraction_to_percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}

/// A function, method or accessor reported by the complexity analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodeUnit {
    pub name: String,
    pub file: PathBuf,
    /// First line of the unit, 1-based.
    pub start_line: u32,
    /// Last line of the unit, inclusive.
    pub end_line: u32,
    pub complexity: u32,
}

/// One scored code unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    pub name: String,
    pub file: String,
    pub line: u32,
    pub complexity: u32,
    /// Coverage percentage in [0, 100].
    pub coverage: f64,
    #[serde(rename = "crap")]
    pub score: f64,
}

/// A point in a file where the execution count changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    pub line: u32,
    pub column: u32,
    pub count: u64,
    pub has_count: bool,
    pub is_region_entry: bool,
}

impl Segment {
    pub fn new(line: u32, column: u32, count: u64, has_count: bool, is_region_entry: bool) -> Self {
        Self {
            line,
            column,
            count,
            has_count,
            is_region_entry,
        }
    }
}
