//! Command handler functions for the crapcov CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::analyze::score_units;
use crate::config::{prefer, prefer_flag, prefer_list, ConfigFile};
use crate::detect::Format;
use crate::index::CoverageProvider;
use crate::report::{filter_entries, sort_by_risk, JsonFormatter, ReportFormatter, TableFormatter};
use crate::source::{load_source, CoverageOptions};
use crate::units::{exclude_units, exclusion_patterns, load_units};

/// Where to get coverage from. At most one source is used per run.
#[derive(Args, Debug, Clone, Default)]
pub struct CoverageArgs {
    /// Path to an .xcresult bundle (exported with `xcrun xccov`).
    #[arg(long)]
    pub xcresult: Option<PathBuf>,

    /// Path to a .profdata file (exported with `llvm-cov`, needs --binary).
    #[arg(long)]
    pub profdata: Option<PathBuf>,

    /// Instrumented binary for --profdata.
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Already exported xccov or llvm-cov JSON file.
    #[arg(long)]
    pub coverage: Option<PathBuf>,

    /// Override format detection for --coverage (xccov, llvm-cov).
    #[arg(long)]
    pub format: Option<String>,

    /// Kill the coverage exporter after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl CoverageArgs {
    /// Merge with the config file; command-line values win.
    pub fn resolve(self, config: &ConfigFile) -> Result<CoverageOptions> {
        let format = prefer(self.format, config.format.clone())
            .map(|f| f.parse::<Format>())
            .transpose()?;
        Ok(CoverageOptions {
            xcresult: prefer(self.xcresult, config.xcresult.clone()),
            profdata: prefer(self.profdata, config.profdata.clone()),
            binary: prefer(self.binary, config.binary.clone()),
            coverage_file: prefer(self.coverage, config.coverage.clone()),
            format,
            timeout: prefer(self.timeout_secs, config.timeout_secs).map(Duration::from_secs),
        })
    }
}

/// Options of the `score` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ScoreArgs {
    /// JSON file of code units produced by the complexity analyzer.
    pub units: Option<PathBuf>,

    #[command(flatten)]
    pub coverage: CoverageArgs,

    /// Only show functions with a CRAP score at or above this value.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Only show functions whose name contains this text (repeatable).
    #[arg(long)]
    pub filter: Vec<String>,

    /// Skip units whose file path contains this text, ignoring case (repeatable).
    #[arg(long)]
    pub exclude_path: Vec<String>,

    /// Skip common generated source locations.
    #[arg(long, overrides_with = "no_exclude_generated")]
    pub exclude_generated: bool,

    /// Keep generated sources even when the config excludes them.
    #[arg(long, overrides_with = "exclude_generated")]
    pub no_exclude_generated: bool,

    /// Output as JSON.
    #[arg(long, overrides_with = "no_json")]
    pub json: bool,

    /// Output a table even when the config asks for JSON.
    #[arg(long, overrides_with = "json")]
    pub no_json: bool,
}

/// Fully resolved `score` options.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOptions {
    pub units: PathBuf,
    pub coverage: CoverageOptions,
    pub threshold: Option<f64>,
    pub filters: Vec<String>,
    pub exclude: Vec<String>,
    pub json: bool,
}

impl ScoreArgs {
    /// Merge with the config file; command-line values win.
    pub fn resolve(self, config: &ConfigFile) -> Result<ScoreOptions> {
        let units = prefer(self.units, config.units.clone()).context(
            "No code units given: pass a units JSON file or set `units` in .crapcov.yml",
        )?;
        let exclude_path = prefer_list(self.exclude_path, config.exclude_path.clone());
        let exclude_generated = prefer_flag(
            cli_flag(self.exclude_generated, self.no_exclude_generated),
            config.exclude_generated,
        );

        Ok(ScoreOptions {
            units,
            coverage: self.coverage.resolve(config)?,
            threshold: prefer(self.threshold, config.threshold),
            filters: prefer_list(self.filter, config.filter.clone()),
            exclude: exclusion_patterns(&exclude_path, exclude_generated),
            json: prefer_flag(cli_flag(self.json, self.no_json), config.json),
        })
    }
}

/// A `--flag` / `--no-flag` pair; `None` when neither was given.
fn cli_flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Read the explicit config file, or `.crapcov.yml` in the working
/// directory when there is one.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config = match explicit {
        Some(path) => Some(ConfigFile::load(path)?),
        None => ConfigFile::discover(Path::new("."))?,
    };
    Ok(config.unwrap_or_default())
}

pub fn cmd_score(opts: &ScoreOptions) -> Result<String> {
    let units = load_units(&opts.units)
        .with_context(|| format!("Failed to read code units from {}", opts.units.display()))?;
    let units = exclude_units(units, &opts.exclude);

    let source = load_source(&opts.coverage).context("Failed to load coverage")?;

    let entries = score_units(&units, &source);
    let mut entries = filter_entries(entries, &opts.filters, opts.threshold);
    sort_by_risk(&mut entries);

    let formatter: &dyn ReportFormatter = if opts.json {
        &JsonFormatter
    } else {
        &TableFormatter
    };
    let mut out = formatter.format(&entries);
    out.push('\n');
    Ok(out)
}

pub fn cmd_coverage(
    coverage: &CoverageOptions,
    file: &Path,
    start_line: u32,
    end_line: u32,
) -> Result<String> {
    let source = load_source(coverage).context("Failed to load coverage")?;
    if !source.is_configured() {
        anyhow::bail!("No coverage source configured (use --xcresult, --profdata/--binary or --coverage)");
    }

    let out = match source.coverage(file, start_line, end_line) {
        Some(pct) => format!(
            "{}:{}-{}: {:.1}% ({})\n",
            file.display(),
            start_line,
            end_line,
            pct,
            source.kind()
        ),
        None => format!(
            "No coverage data for {}:{}-{}\n",
            file.display(),
            start_line,
            end_line
        ),
    };
    Ok(out)
}
