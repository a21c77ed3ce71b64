//! Per-unit coverage lookup and scoring.

use rayon::prelude::*;

use crate::index::{CoverageProvider, CoverageSource};
use crate::model::{CodeUnit, RiskEntry};
use crate::score::crap_score;

/// Coverage assumed for every unit when the run measured no coverage.
pub const UNMEASURED_RUN_COVERAGE: f64 = 100.0;

/// Coverage assumed for a unit the configured source has no data for.
pub const MISSING_UNIT_COVERAGE: f64 = 0.0;

/// Coverage percentage to score `unit` with.
///
/// Without a coverage source every unit counts as fully covered. With one,
/// a unit the source knows nothing about counts as uncovered.
pub fn resolve_coverage(source: &CoverageSource, unit: &CodeUnit) -> f64 {
    if !source.is_configured() {
        return UNMEASURED_RUN_COVERAGE;
    }
    source
        .coverage(&unit.file, unit.start_line, unit.end_line)
        .unwrap_or(MISSING_UNIT_COVERAGE)
}

/// Score every unit against the run's coverage source. Output order
/// matches input order.
pub fn score_units(units: &[CodeUnit], source: &CoverageSource) -> Vec<RiskEntry> {
    let entries: Vec<RiskEntry> = units
        .par_iter()
        .map(|unit| {
            let coverage = resolve_coverage(source, unit);
            RiskEntry {
                name: unit.name.clone(),
                file: unit.file.to_string_lossy().into_owned(),
                line: unit.start_line,
                complexity: unit.complexity,
                coverage,
                score: crap_score(unit.complexity, coverage),
            }
        })
        .collect();

    log::info!(
        "scored {} code units against {} coverage ({} files)",
        entries.len(),
        source.kind(),
        source.len()
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SegmentCoverageIndex;
    use crate::model::Segment;
    use std::path::PathBuf;

    fn unit(name: &str, file: &str, start_line: u32, end_line: u32, complexity: u32) -> CodeUnit {
        CodeUnit {
            name: name.to_string(),
            file: PathBuf::from(file),
            start_line,
            end_line,
            complexity,
        }
    }

    fn segments_source() -> CoverageSource {
        let segments = vec![
            Segment::new(1, 1, 5, true, true),
            Segment::new(3, 1, 0, true, true),
            Segment::new(5, 1, 3, true, true),
            Segment::new(7, 1, 0, false, false),
        ];
        CoverageSource::Segments(SegmentCoverageIndex::from_files([(
            "/project/File.swift",
            segments.as_slice(),
        )]))
    }

    #[test]
    fn test_defaults_to_full_coverage_without_source() {
        let u = unit("f()", "/project/File.swift", 1, 10, 5);
        assert_eq!(resolve_coverage(&CoverageSource::None, &u), 100.0);
    }

    #[test]
    fn test_defaults_to_zero_when_source_has_no_data() {
        let src = segments_source();
        let missing_file = unit("f()", "/project/Other.swift", 1, 10, 5);
        assert_eq!(resolve_coverage(&src, &missing_file), 0.0);

        let uninstrumented_range = unit("g()", "/project/File.swift", 40, 50, 5);
        assert_eq!(resolve_coverage(&src, &uninstrumented_range), 0.0);
    }

    #[test]
    fn test_uses_source_value() {
        let src = segments_source();
        let u = unit("f()", "/project/File.swift", 1, 2, 5);
        assert_eq!(resolve_coverage(&src, &u), 100.0);
    }

    #[test]
    fn test_score_units_preserves_order() {
        let src = segments_source();
        let units = vec![
            unit("covered()", "/project/File.swift", 1, 2, 3),
            unit("uncovered()", "/project/File.swift", 3, 4, 3),
            unit("missing()", "/elsewhere/X.swift", 1, 2, 1),
        ];
        let entries = score_units(&units, &src);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["covered()", "uncovered()", "missing()"]);

        assert_eq!(entries[0].coverage, 100.0);
        assert_eq!(entries[0].score, 3.0);
        assert_eq!(entries[1].coverage, 0.0);
        assert_eq!(entries[1].score, 12.0);
        assert_eq!(entries[2].score, 2.0);
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[0].file, "/project/File.swift");
    }

    #[test]
    fn test_score_units_without_source_scores_complexity() {
        let units = vec![unit("f()", "/a.swift", 1, 9, 7)];
        let entries = score_units(&units, &CoverageSource::None);
        assert_eq!(entries[0].coverage, 100.0);
        assert_eq!(entries[0].score, 7.0);
    }
}
