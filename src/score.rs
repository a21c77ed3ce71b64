//! CRAP (Change Risk Anti-Patterns) score.

/// Fuse a complexity count and a coverage percentage into a risk score:
/// `c² × (1 − p/100)³ + c`.
///
/// `coverage_percent` is clamped to [0, 100]. A fully covered unit scores
/// exactly its complexity; an untested one scores `c² + c`.
#[must_use]
pub fn crap_score(complexity: u32, coverage_percent: f64) -> f64 {
    let cc = f64::from(complexity);
    let uncovered = 1.0 - coverage_percent.clamp(0.0, 100.0) / 100.0;
    cc * cc * uncovered.powi(3) + cc
}
