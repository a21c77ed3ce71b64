//! Line-range coverage index built from llvm-cov region segments.
//!
//! Each file's segments are expanded once into per-line instrumented and
//! covered flags, then folded into prefix sums so a range query is two
//! subtractions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::CoverageProvider;
use crate::model::{percent, Segment};
use crate::parsers::llvm_cov::LlvmCovExport;
use crate::path::{normalize, PathResolver};

/// Segments past this line are dropped. Line tables are dense, so a single
/// corrupt line number would otherwise size the table.
pub const MAX_SOURCE_LINE: u32 = 1_000_000;

/// Prefix sums of instrumented and covered lines for one file.
///
/// `instrumented[n]` is the number of instrumented lines in `1..=n`;
/// index 0 is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    max_line: u32,
    instrumented: Vec<u32>,
    covered: Vec<u32>,
}

impl LineTable {
    /// Expand segments into line flags.
    ///
    /// A counted segment owns the lines from its own line up to (excluding)
    /// the line of the next segment in (line, column) order. The last
    /// segment owns only its own line. Segments beyond `MAX_SOURCE_LINE`
    /// are ignored.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut sorted: Vec<Segment> = segments
            .iter()
            .filter(|s| s.line <= MAX_SOURCE_LINE)
            .copied()
            .collect();
        let dropped = segments.len() - sorted.len();
        if dropped > 0 {
            log::warn!("ignoring {dropped} coverage segments past line {MAX_SOURCE_LINE}");
        }
        sorted.sort_by_key(|s| (s.line, s.column));

        let mut regions: Vec<(u32, u32, bool)> = Vec::new();
        for (i, seg) in sorted.iter().enumerate() {
            if !seg.has_count || seg.line == 0 {
                continue;
            }
            let boundary = match sorted.get(i + 1) {
                Some(next) => next.line,
                None => seg.line.saturating_add(1),
            };
            if boundary > seg.line {
                regions.push((seg.line, boundary, seg.count > 0));
            }
        }

        let max_line = regions.iter().map(|&(_, end, _)| end - 1).max().unwrap_or(0);
        let len = max_line as usize + 1;
        let mut instrumented_flags = vec![false; len];
        let mut covered_flags = vec![false; len];
        for (start, end, hit) in regions {
            for line in start..end {
                instrumented_flags[line as usize] = true;
                covered_flags[line as usize] = hit;
            }
        }

        Self {
            max_line,
            instrumented: prefix_sums(&instrumented_flags),
            covered: prefix_sums(&covered_flags),
        }
    }

    /// Highest instrumented line, 0 when nothing is instrumented.
    pub fn max_line(&self) -> u32 {
        self.max_line
    }

    /// Percentage of instrumented lines in `[start_line, end_line]` that
    /// executed, or `None` when the range holds no instrumented line.
    pub fn coverage(&self, start_line: u32, end_line: u32) -> Option<f64> {
        let start = start_line.max(1) as usize;
        let end = end_line.min(self.max_line) as usize;
        if start > end {
            return None;
        }

        let instrumented = self.instrumented[end] - self.instrumented[start - 1];
        if instrumented == 0 {
            return None;
        }
        let covered = self.covered[end] - self.covered[start - 1];
        Some(percent(u64::from(covered), u64::from(instrumented)))
    }
}

fn prefix_sums(flags: &[bool]) -> Vec<u32> {
    let mut sums = Vec::with_capacity(flags.len());
    let mut total = 0u32;
    for (line, &flag) in flags.iter().enumerate() {
        // Line 0 does not exist; its slot anchors the sums at zero.
        if line > 0 && flag {
            total += 1;
        }
        sums.push(total);
    }
    sums
}

/// Per-file segment coverage, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SegmentCoverageIndex {
    files: HashMap<PathBuf, LineTable>,
    resolver: PathResolver,
}

impl SegmentCoverageIndex {
    pub fn build(export: &LlvmCovExport) -> Self {
        let files = export
            .data
            .iter()
            .flat_map(|entry| &entry.files)
            .map(|file| (file.filename.as_str(), file.segments.as_slice()));
        Self::from_files(files)
    }

    /// Build from `(path, segments)` pairs. A path seen twice keeps the
    /// last occurrence.
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Segment])>,
    {
        let mut latest: HashMap<PathBuf, &'a [Segment]> = HashMap::new();
        for (path, segments) in files {
            if latest.insert(normalize(path), segments).is_some() {
                log::debug!("segment coverage index: duplicate entry for {path}, keeping the last");
            }
        }

        let files: HashMap<PathBuf, LineTable> = latest
            .into_iter()
            .map(|(path, segments)| (path, LineTable::from_segments(segments)))
            .collect();

        log::debug!("segment coverage index: {} files", files.len());

        let resolver = PathResolver::new(files.keys().cloned());
        Self { files, resolver }
    }

    /// Look up the line table for `file`, resolving path spelling.
    pub fn table(&self, file: &Path) -> Option<&LineTable> {
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

impl CoverageProvider for SegmentCoverageIndex {
    fn coverage(&self, file: &Path, start_line: u32, end_line: u32) -> Option<f64> {
        self.table(file)?.coverage(start_line, end_line)
    }
}
