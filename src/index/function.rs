//! Function-level coverage index built from an xccov report.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::CoverageProvider;
use crate::model::fraction_to_percent;
use crate::parsers::xccov::XccovReport;
use crate::path::{normalize, PathResolver};

/// Coverage of one function, keyed by its declaration line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionEntry {
    pub line: u32,
    pub coverage: f64,
}

/// Merged coverage for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub file_coverage: f64,
    /// Sorted ascending by line, one entry per line.
    pub functions: Vec<FunctionEntry>,
}

impl FileEntry {
    /// Coverage of the first function declared inside `[start_line,
    /// end_line]`, or the whole-file coverage when none is.
    pub fn coverage(&self, start_line: u32, end_line: u32) -> f64 {
        let idx = self.functions.partition_point(|f| f.line < start_line);
        match self.functions.get(idx) {
            Some(f) if f.line <= end_line => f.coverage,
            _ => self.file_coverage,
        }
    }
}

/// Per-file function coverage, immutable once built.
///
/// A file reported by several targets (app and test bundle, say) is merged
/// by taking the best coverage any target observed, both for the file rate
/// and per function line.
#[derive(Debug, Clone, Default)]
pub struct FunctionCoverageIndex {
    files: HashMap<PathBuf, FileEntry>,
    resolver: PathResolver,
}

#[derive(Default)]
struct FileAccumulator {
    file_coverage: f64,
    functions: BTreeMap<u32, f64>,
}

impl FunctionCoverageIndex {
    pub fn build(report: &XccovReport) -> Self {
        let mut acc: HashMap<PathBuf, FileAccumulator> = HashMap::new();
        let mut records = 0usize;

        for target in &report.targets {
            for file in &target.files {
                records += 1;
                let entry = acc.entry(normalize(&file.path)).or_default();
                entry.file_coverage = entry
                    .file_coverage
                    .max(fraction_to_percent(file.line_coverage));

                for func in file.functions.iter().flatten() {
                    let coverage = fraction_to_percent(func.line_coverage);
                    entry
                        .functions
                        .entry(func.line_number)
                        .and_modify(|c| *c = c.max(coverage))
                        .or_insert(coverage);
                }
            }
        }

        let files: HashMap<PathBuf, FileEntry> = acc
            .into_iter()
            .map(|(path, a)| {
                let functions = a
                    .functions
                    .into_iter()
                    .map(|(line, coverage)| FunctionEntry { line, coverage })
                    .collect();
                (
                    path,
                    FileEntry {
                        file_coverage: a.file_coverage,
                        functions,
                    },
                )
            })
            .collect();

        log::debug!(
            "function coverage index: {} records merged into {} files",
            records,
            files.len()
        );

        let resolver = PathResolver::new(files.keys().cloned());
        Self { files, resolver }
    }

    /// Look up the merged entry for `file`, resolving path spelling.
    pub fn entry(&self, file: &Path) -> Option<&FileEntry> {
        let key = self.resolver.resolve(file)?;
        self.files.get(key)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl CoverageProvider for FunctionCoverageIndex {
    fn coverage(&self, file: &Path, start_line: u32, end_line: u32) -> Option<f64> {
        self.entry(file)
            .map(|entry| entry.coverage(start_line, end_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::xccov::{FileRecord, FunctionRecord, Target};

    fn file(path: &str, line_coverage: f64, functions: Option<Vec<(u32, f64)>>) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            line_coverage,
            functions: functions.map(|fs| {
                fs.into_iter()
                    .map(|(line_number, line_coverage)| FunctionRecord {
                        name: format!("f{line_number}()"),
                        line_coverage,
                        line_number,
                        execution_count: 1,
                    })
                    .collect()
            }),
        }
    }

    fn index(targets: Vec<Vec<FileRecord>>) -> FunctionCoverageIndex {
        let report = XccovReport {
            targets: targets.into_iter().map(|files| Target { files }).collect(),
        };
        FunctionCoverageIndex::build(&report)
    }

    #[test]
    fn test_function_match_takes_priority() {
        let idx = index(vec![vec![file(
            "/project/Logic.swift",
            0.5,
            Some(vec![(10, 0.8), (25, 0.3)]),
        )]]);
        let path = Path::new("/project/Logic.swift");
        assert_eq!(idx.coverage(path, 10, 20), Some(80.0));
        assert_eq!(idx.coverage(path, 21, 30), Some(30.0));
    }

    #[test]
    fn test_file_fallback_when_no_function_in_range() {
        let idx = index(vec![vec![file("/project/Logic.swift", 0.5, Some(vec![(10, 0.8)]))]]);
        assert_eq!(idx.coverage(Path::new("/project/Logic.swift"), 30, 40), Some(50.0));
        assert_eq!(idx.coverage(Path::new("/project/Logic.swift"), 1, 9), Some(50.0));
    }

    #[test]
    fn test_zero_coverage_file_is_not_missing() {
        let idx = index(vec![vec![file("/project/Untested.swift", 0.0, None)]]);
        assert_eq!(idx.coverage(Path::new("/project/Untested.swift"), 1, 50), Some(0.0));
    }

    #[test]
    fn test_unknown_file_is_none() {
        let idx = index(vec![vec![file("/project/Other.swift", 1.0, None)]]);
        assert_eq!(idx.coverage(Path::new("/project/Logic.swift"), 1, 10), None);
    }

    #[test]
    fn test_duplicate_records_merge_by_max() {
        let idx = index(vec![
            vec![file("/project/Logic.swift", 0.5, Some(vec![(10, 0.8), (25, 0.3)]))],
            vec![file("/project/./Logic.swift", 0.65, Some(vec![(10, 0.6), (25, 0.9), (40, 0.1)]))],
        ]);
        assert_eq!(idx.len(), 1);

        let entry = idx.entry(Path::new("/project/Logic.swift")).unwrap();
        assert_eq!(entry.file_coverage, 65.0);
        let lines: Vec<u32> = entry.functions.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![10, 25, 40]);
        assert_eq!(entry.functions[0].coverage, 80.0);
        assert_eq!(entry.functions[1].coverage, 90.0);
    }

    #[test]
    fn test_ambiguous_suffix_prefers_longest_path() {
        let idx = index(vec![vec![
            file("/var/folders/x/File.swift", 0.10, None),
            file("/private/var/folders/x/File.swift", 0.90, None),
        ]]);
        let cov = idx.coverage(
            Path::new("/worktree/symlink/private/var/folders/x/File.swift"),
            1,
            10,
        );
        assert_eq!(cov, Some(90.0));
    }

    #[test]
    fn test_fractions_are_clamped() {
        let idx = index(vec![vec![file("/a.swift", 1.7, Some(vec![(3, -0.2)]))]]);
        assert_eq!(idx.coverage(Path::new("/a.swift"), 1, 2), Some(100.0));
        assert_eq!(idx.coverage(Path::new("/a.swift"), 3, 3), Some(0.0));
    }
}
