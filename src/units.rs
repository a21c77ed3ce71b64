//! Code units handed over by the complexity analyzer.
//!
//! The analyzer writes a JSON array of
//! `{ "name", "file", "start_line", "end_line", "complexity" }` records.

use std::path::Path;

use crate::error::{CrapError, Result};
use crate::model::CodeUnit;

/// Path fragments that mark generated sources.
pub const GENERATED_PATTERNS: &[&str] = &[
    "/.build/",
    "/GeneratedSources/",
    "/Generated/",
    "/DerivedSources/",
    "/Sourcery/",
    ".generated.swift",
    "GeneratedTypes.swift",
];

/// Read and validate code units from a JSON file.
pub fn load_units(path: &Path) -> Result<Vec<CodeUnit>> {
    let content = std::fs::read(path)?;
    parse_units(&content)
}

/// Decode and validate code units.
pub fn parse_units(input: &[u8]) -> Result<Vec<CodeUnit>> {
    let units: Vec<CodeUnit> = serde_json::from_slice(input)
        .map_err(|e| CrapError::Decode(format!("invalid code unit list: {e}")))?;
    for unit in &units {
        validate(unit)?;
    }
    Ok(units)
}

fn validate(unit: &CodeUnit) -> Result<()> {
    let problem = if unit.complexity == 0 {
        "complexity must be at least 1"
    } else if unit.start_line == 0 {
        "lines are 1-based"
    } else if unit.start_line > unit.end_line {
        "start line is after end line"
    } else {
        return Ok(());
    };
    Err(CrapError::InvalidUnit(format!(
        "{} ({}:{}-{}): {}",
        unit.name,
        unit.file.display(),
        unit.start_line,
        unit.end_line,
        problem
    )))
}

/// Drop units whose file path contains any of `patterns`, ignoring case.
pub fn exclude_units(units: Vec<CodeUnit>, patterns: &[String]) -> Vec<CodeUnit> {
    if patterns.is_empty() {
        return units;
    }
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    let before = units.len();
    let kept: Vec<CodeUnit> = units
        .into_iter()
        .filter(|unit| {
            let path = unit.file.to_string_lossy().to_lowercase();
            !patterns.iter().any(|p| path.contains(p.as_str()))
        })
        .collect();
    log::debug!("excluded {} of {} code units by path", before - kept.len(), before);
    kept
}

/// Exclusion patterns from explicit paths plus, optionally, the generated
/// source preset.
pub fn exclusion_patterns(exclude_path: &[String], exclude_generated: bool) -> Vec<String> {
    let mut patterns = exclude_path.to_vec();
    if exclude_generated {
        patterns.extend(GENERATED_PATTERNS.iter().map(|p| p.to_string()));
    }
    patterns
}
