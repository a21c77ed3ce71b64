/// Detection of pre-exported coverage JSON formats.
///
/// Both formats are JSON, so extensions carry no signal; detection looks
/// at the top-level keys of the document. llvm-cov sorts its keys, so no
/// fixed-size prefix of an export is guaranteed to hold a marker.
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::CrapError;

/// Supported coverage export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `xcrun xccov view --report --json`: per-file and per-function rates.
    Xccov,
    /// `llvm-cov export`: per-file region segments.
    LlvmCov,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Xccov => "xccov",
            Format::LlvmCov => "llvm-cov",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = CrapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xccov" | "xcresult" => Ok(Format::Xccov),
            "llvm-cov" | "llvm_cov" | "llvm" => Ok(Format::LlvmCov),
            _ => Err(CrapError::Config(format!(
                "Unknown format: '{}'. Supported: xccov, llvm-cov",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level keys that identify an export. Everything else is skipped
/// without being materialized.
#[derive(Deserialize)]
struct TopLevelKeys {
    data: Option<IgnoredAny>,
    targets: Option<IgnoredAny>,
}

/// Detect the coverage format from the file content.
///
/// `targets` marks an xccov report and `data` an llvm-cov export.
pub fn detect_format(content: &[u8]) -> Option<Format> {
    let keys: TopLevelKeys = serde_json::from_slice(content).ok()?;
    match (keys.targets, keys.data) {
        (Some(_), _) => Some(Format::Xccov),
        (None, Some(_)) => Some(Format::LlvmCov),
        (None, None) => None,
    }
}
