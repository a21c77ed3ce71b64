use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detect::{detect_format, Format};
use crate::error::{CrapError, Result};
use crate::export::ExportCommand;
use crate::index::CoverageSource;
use crate::parsers;

/// Where this run's coverage comes from. At most one source is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageOptions {
    /// `.xcresult` bundle, exported with `xccov`.
    pub xcresult: Option<PathBuf>,
    /// `.profdata` file, exported with `llvm-cov` together with `binary`.
    pub profdata: Option<PathBuf>,
    pub binary: Option<PathBuf>,
    /// An already exported xccov or llvm-cov JSON file.
    pub coverage_file: Option<PathBuf>,
    /// Format override for `coverage_file`.
    pub format: Option<Format>,
    /// Kill the exporter after this long.
    pub timeout: Option<Duration>,
}

/// How a source will be obtained, decided before any work is done.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePlan {
    Export(ExportCommand, Format),
    File(PathBuf),
    None,
}

impl CoverageOptions {
    /// Pick the single source to use: xcresult, then profdata + binary,
    /// then a pre-exported file.
    pub fn plan(&self) -> Result<SourcePlan> {
        if let Some(xcresult) = &self.xcresult {
            return Ok(SourcePlan::Export(ExportCommand::xccov(xcresult), Format::Xccov));
        }
        match (&self.profdata, &self.binary) {
            (Some(profdata), Some(binary)) => {
                return Ok(SourcePlan::Export(
                    ExportCommand::llvm_cov(profdata, binary),
                    Format::LlvmCov,
                ));
            }
            (Some(_), None) => {
                return Err(CrapError::Config("--profdata requires --binary".to_string()))
            }
            (None, Some(_)) => {
                return Err(CrapError::Config("--binary requires --profdata".to_string()))
            }
            (None, None) => {}
        }
        Ok(match &self.coverage_file {
            Some(path) => SourcePlan::File(path.clone()),
            None => SourcePlan::None,
        })
    }
}

/// Obtain and index the coverage for this run.
pub fn load_source(options: &CoverageOptions) -> Result<CoverageSource> {
    match options.plan()? {
        SourcePlan::Export(command, format) => {
            let output = command.run(options.timeout)?;
            build_source(format, &output)
        }
        SourcePlan::File(path) => load_file(&path, options.format),
        SourcePlan::None => {
            log::info!("no coverage source configured; assuming full coverage");
            Ok(CoverageSource::None)
        }
    }
}

/// Index a pre-exported coverage file, detecting its format unless
/// `format_override` is given.
pub fn load_file(path: &Path, format_override: Option<Format>) -> Result<CoverageSource> {
    let content = std::fs::read(path)?;
    let format = match format_override {
        Some(format) => format,
        None => detect_format(&content).ok_or(CrapError::UnknownFormat)?,
    };
    log::info!("loading {} coverage from {}", format, path.display());
    build_source(format, &content)
}

/// Decode an export payload and build its index.
pub fn build_source(format: Format, content: &[u8]) -> Result<CoverageSource> {
    let raw = parsers::parse(format, content)?;
    Ok(CoverageSource::build(&raw))
}
