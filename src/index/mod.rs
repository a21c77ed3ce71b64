pub mod function;
pub mod segment;

use std::path::Path;

pub use function::FunctionCoverageIndex;
pub use segment::SegmentCoverageIndex;

use crate::parsers::RawCoverage;

/// Answers "what percentage of lines in `[start_line, end_line]` of `file`
/// executed?". `None` means there is no data for that file or range.
pub trait CoverageProvider: Sync {
    fn coverage(&self, file: &Path, start_line: u32, end_line: u32) -> Option<f64>;
}

/// The coverage source selected for a run. At most one index exists.
#[derive(Debug, Clone, Default)]
pub enum CoverageSource {
    FunctionReport(FunctionCoverageIndex),
    Segments(SegmentCoverageIndex),
    #[default]
    None,
}

impl CoverageSource {
    /// Build the index matching the decoded payload.
    pub fn build(raw: &RawCoverage) -> Self {
        match raw {
            RawCoverage::FunctionReport(report) => {
                CoverageSource::FunctionReport(FunctionCoverageIndex::build(report))
            }
            RawCoverage::Segments(export) => {
                CoverageSource::Segments(SegmentCoverageIndex::build(export))
            }
        }
    }

    /// Whether coverage was measured at all for this run.
    pub fn is_configured(&self) -> bool {
        !matches!(self, CoverageSource::None)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoverageSource::FunctionReport(_) => "xccov",
            CoverageSource::Segments(_) => "llvm-cov",
            CoverageSource::None => "none",
        }
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        match self {
            CoverageSource::FunctionReport(idx) => idx.len(),
            CoverageSource::Segments(idx) => idx.len(),
            CoverageSource::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CoverageProvider for CoverageSource {
    fn coverage(&self, file: &Path, start_line: u32, end_line: u32) -> Option<f64> {
        match self {
            CoverageSource::FunctionReport(idx) => idx.coverage(file, start_line, end_line),
            CoverageSource::Segments(idx) => idx.coverage(file, start_line, end_line),
            CoverageSource::None => None,
        }
    }
}
