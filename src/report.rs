//! Filtering, ordering and rendering of risk entries.

use std::fmt::Write;

use crate::model::RiskEntry;

/// Keep entries whose name contains any of `filters` (all entries when
/// `filters` is empty) and, with a threshold, whose score reaches it.
pub fn filter_entries(
    entries: Vec<RiskEntry>,
    filters: &[String],
    threshold: Option<f64>,
) -> Vec<RiskEntry> {
    entries
        .into_iter()
        .filter(|e| filters.is_empty() || filters.iter().any(|f| e.name.contains(f.as_str())))
        .filter(|e| threshold.map_or(true, |t| e.score >= t))
        .collect()
}

/// Riskiest first; equal scores ordered by location.
pub fn sort_by_risk(entries: &mut [RiskEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });
}

/// Trait for rendering a list of risk entries.
pub trait ReportFormatter {
    fn format(&self, entries: &[RiskEntry]) -> String;
}

/// Aligned plain-text table.
pub struct TableFormatter;

const COLUMNS: [&str; 5] = ["Function", "File", "CC", "Cov%", "CRAP"];

impl ReportFormatter for TableFormatter {
    fn format(&self, entries: &[RiskEntry]) -> String {
        if entries.is_empty() {
            return "No functions found.".to_string();
        }

        let locations: Vec<String> = entries.iter().map(location).collect();

        let name_width = entries
            .iter()
            .map(|e| e.name.chars().count())
            .chain([COLUMNS[0].len()])
            .max()
            .unwrap_or(0);
        let file_width = locations
            .iter()
            .map(|l| l.chars().count())
            .chain([COLUMNS[1].len()])
            .max()
            .unwrap_or(0);
        let cc_width = 4;
        let cov_width = 6;
        let crap_width = 8;
        let total = name_width + file_width + cc_width + cov_width + crap_width + 8;

        let mut out = String::new();
        writeln!(out, "CRAP Report").unwrap();
        writeln!(out, "===========").unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "{:<name_width$}  {:<file_width$}  {:>cc_width$}  {:>cov_width$}  {:>crap_width$}",
            COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
        )
        .unwrap();
        write!(out, "{}", "-".repeat(total)).unwrap();

        for (entry, loc) in entries.iter().zip(&locations) {
            write!(
                out,
                "\n{:<name_width$}  {:<file_width$}  {:>cc_width$}  {:>cov_width$}  {:>crap_width$.1}",
                entry.name,
                loc,
                entry.complexity,
                format!("{:.1}%", entry.coverage),
                entry.score
            )
            .unwrap();
        }

        out
    }
}

/// Pretty-printed JSON array with keys in alphabetical order.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, entries: &[RiskEntry]) -> String {
        // Going through `Value` sorts object keys.
        serde_json::to_value(entries)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or_else(|_| "[]".to_string())
    }
}

fn location(entry: &RiskEntry) -> String {
    format!("{}:{}", entry.file, entry.line)
}
