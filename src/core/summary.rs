//! Rhythm statistics for a typing sample.

use crate::capture::types::KeyEvent;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary of the gaps in a pattern.
///
/// The first keystroke's gap is measured from session start, which is idle
/// time rather than rhythm, so it is left out of the gap statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadenceSummary {
    /// Number of keystrokes
    pub keystrokes: usize,
    /// Time from the first keystroke to the last, in milliseconds
    /// (saturates on absurd stored gaps)
    pub total_ms: i64,
    /// Average gap between keystrokes
    pub mean_gap_ms: f64,
    /// Population standard deviation of the gaps
    pub gap_std_dev_ms: f64,
    /// Shortest gap
    pub min_gap_ms: i64,
    /// Longest gap
    pub max_gap_ms: i64,
}

impl CadenceSummary {
    pub fn from_pattern(pattern: &[KeyEvent]) -> Self {
        let gaps: Vec<i64> = pattern.iter().skip(1).map(|e| e.time_diff).collect();
        if gaps.is_empty() {
            return Self {
                keystrokes: pattern.len(),
                ..Self::default()
            };
        }

        let as_f64: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();

        Self {
            keystrokes: pattern.len(),
            total_ms: gaps.iter().fold(0i64, |total, &g| total.saturating_add(g)),
            mean_gap_ms: as_f64.iter().mean(),
            gap_std_dev_ms: as_f64.iter().population_std_dev(),
            min_gap_ms: Iterator::min(gaps.iter().copied()).unwrap_or_default(),
            max_gap_ms: Iterator::max(gaps.iter().copied()).unwrap_or_default(),
        }
    }

    /// Keystrokes per second over the typed span, zero when undefined.
    pub fn keys_per_second(&self) -> f64 {
        if self.total_ms <= 0 {
            return 0.0;
        }
        (self.keystrokes.saturating_sub(1)) as f64 / (self.total_ms as f64 / 1000.0)
    }
}
