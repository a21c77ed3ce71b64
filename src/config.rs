//! Optional `.crapcov.yml` configuration.
//!
//! ```yaml
//! units: build/units.json
//! profdata: default.profdata
//! binary: .build/debug/AppPackageTests.xctest
//! threshold: 30
//! filter: [viewDidLoad]
//! exclude-path: [/Vendor/]
//! exclude-generated: true
//! json: false
//! timeout-secs: 120
//! ```
//!
//! Values given on the command line always win over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CrapError, Result};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".crapcov.yml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub units: Option<PathBuf>,
    pub xcresult: Option<PathBuf>,
    pub profdata: Option<PathBuf>,
    pub binary: Option<PathBuf>,
    pub coverage: Option<PathBuf>,
    pub format: Option<String>,
    pub threshold: Option<f64>,
    pub filter: Option<Vec<String>>,
    pub exclude_path: Option<Vec<String>>,
    pub exclude_generated: Option<bool>,
    pub json: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn parse(input: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|e| CrapError::Config(format!("invalid config: {e}")))
    }

    /// Load the config from an explicit path; the file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrapError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Load `.crapcov.yml` from `dir` if present.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        log::debug!("using config {}", path.display());
        Self::load(&path).map(Some)
    }
}

/// Command-line value if given, else the config value.
pub fn prefer<T>(cli: Option<T>, config: Option<T>) -> Option<T> {
    cli.or(config)
}

/// Command-line list if non-empty, else the config list.
pub fn prefer_list(cli: Vec<String>, config: Option<Vec<String>>) -> Vec<String> {
    if cli.is_empty() {
        config.unwrap_or_default()
    } else {
        cli
    }
}

/// An explicit command-line setting wins; otherwise the config decides.
/// Unset everywhere means off.
pub fn prefer_flag(cli: Option<bool>, config: Option<bool>) -> bool {
    cli.or(config).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ConfigFile::parse(
            "units: build/units.json\n\
             xcresult: .build/tests.xcresult\n\
             threshold: 30\n\
             filter:\n  - viewDidLoad\n\
             exclude-path:\n  - /GeneratedSources/\n\
             exclude-generated: true\n\
             json: true\n\
             timeout-secs: 90\n",
        )
        .unwrap();

        assert_eq!(config.units, Some(PathBuf::from("build/units.json")));
        assert_eq!(config.xcresult, Some(PathBuf::from(".build/tests.xcresult")));
        assert_eq!(config.threshold, Some(30.0));
        assert_eq!(config.filter, Some(vec!["viewDidLoad".to_string()]));
        assert_eq!(config.exclude_path, Some(vec!["/GeneratedSources/".to_string()]));
        assert_eq!(config.exclude_generated, Some(true));
        assert_eq!(config.json, Some(true));
        assert_eq!(config.timeout_secs, Some(90));
        assert_eq!(config.profdata, None);
    }

    #[test]
    fn test_parse_llvm_config() {
        let config = ConfigFile::parse("profdata: default.profdata\nbinary: .build/debug/App\n").unwrap();
        assert_eq!(config.profdata, Some(PathBuf::from("default.profdata")));
        assert_eq!(config.binary, Some(PathBuf::from(".build/debug/App")));
        assert_eq!(config.xcresult, None);
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(ConfigFile::parse("{{{{not yaml"), Err(CrapError::Config(_))));
        assert!(matches!(ConfigFile::parse("treshold: 3\n"), Err(CrapError::Config(_))));
    }

    #[test]
    fn test_discover_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ConfigFile::discover(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_discover_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "threshold: 25\n").unwrap();
        let config = ConfigFile::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.threshold, Some(25.0));
    }

    #[test]
    fn test_command_line_wins() {
        assert_eq!(prefer(Some(50.0), Some(10.0)), Some(50.0));
        assert_eq!(prefer(None, Some(10.0)), Some(10.0));
        assert_eq!(
            prefer_list(vec!["a".into()], Some(vec!["b".into()])),
            vec!["a".to_string()]
        );
        assert_eq!(prefer_list(vec![], Some(vec!["b".into()])), vec!["b".to_string()]);
        assert!(prefer_flag(Some(true), Some(false)));
        assert!(!prefer_flag(Some(false), Some(true)));
        assert!(prefer_flag(None, Some(true)));
        assert!(!prefer_flag(None, None));
    }
}
