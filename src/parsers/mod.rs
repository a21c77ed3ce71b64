pub mod llvm_cov;
pub mod xccov;

use crate::detect::Format;
use crate::error::Result;

/// A decoded coverage payload, still in the exporter's own shape.
#[derive(Debug, Clone)]
pub enum RawCoverage {
    FunctionReport(xccov::XccovReport),
    Segments(llvm_cov::LlvmCovExport),
}

/// Decode `input` as the given format.
pub fn parse(format: Format, input: &[u8]) -> Result<RawCoverage> {
    match format {
        Format::Xccov => xccov::parse(input).map(RawCoverage::FunctionReport),
        Format::LlvmCov => llvm_cov::parse(input).map(RawCoverage::Segments),
    }
}
