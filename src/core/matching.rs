//! Position-by-position comparison of a candidate pattern against a reference.
//!
//! `compare` inspects every position so a caller can show which keystrokes
//! broke the rhythm. Its verdict is the same as `CadenceTracker::verify_within`.

use crate::capture::types::KeyEvent;
use serde::{Deserialize, Serialize};

/// Why a single position failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchKind {
    /// A different key was pressed
    Key { expected: String, actual: String },
    /// The gap deviated by at least the tolerance
    Timing {
        expected_ms: i64,
        actual_ms: i64,
        deviation_ms: u64,
    },
}

/// A failing position in the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub index: usize,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

/// Overall comparison result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Match,
    LengthMismatch { expected: usize, actual: usize },
    Mismatch { mismatches: Vec<Mismatch> },
}

/// Result of comparing a candidate against a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    /// Tolerance the comparison used, in milliseconds
    pub tolerance_ms: u64,
    /// Number of positions compared (zero on a length mismatch)
    pub compared: usize,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Match)
    }

    /// Failing positions, empty unless the outcome is `Mismatch`.
    pub fn mismatches(&self) -> &[Mismatch] {
        match &self.outcome {
            MatchOutcome::Mismatch { mismatches } => mismatches,
            _ => &[],
        }
    }
}

impl std::fmt::Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            MatchOutcome::Match => write!(
                f,
                "match: {} keystrokes within {}ms",
                self.compared, self.tolerance_ms
            ),
            MatchOutcome::LengthMismatch { expected, actual } => write!(
                f,
                "length mismatch: expected {expected} keystrokes, got {actual}"
            ),
            MatchOutcome::Mismatch { mismatches } => {
                write!(
                    f,
                    "mismatch: {} of {} keystrokes differ",
                    mismatches.len(),
                    self.compared
                )?;
                for m in mismatches {
                    match &m.kind {
                        MismatchKind::Key { expected, actual } => {
                            write!(f, "\n  #{}: key {actual:?}, expected {expected:?}", m.index)?
                        }
                        MismatchKind::Timing {
                            expected_ms,
                            actual_ms,
                            deviation_ms,
                        } => write!(
                            f,
                            "\n  #{}: gap {actual_ms}ms, expected {expected_ms}ms (off by {deviation_ms}ms)",
                            m.index
                        )?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Compare `candidate` against `reference` with a strict per-gap tolerance.
pub fn compare(candidate: &[KeyEvent], reference: &[KeyEvent], tolerance_ms: u64) -> MatchReport {
    if candidate.len() != reference.len() {
        return MatchReport {
            outcome: MatchOutcome::LengthMismatch {
                expected: reference.len(),
                actual: candidate.len(),
            },
            tolerance_ms,
            compared: 0,
        };
    }

    let mismatches: Vec<Mismatch> = candidate
        .iter()
        .zip(reference)
        .enumerate()
        .filter_map(|(index, (actual, expected))| {
            // A wrong key is reported before its timing.
            if actual.key != expected.key {
                return Some(Mismatch {
                    index,
                    kind: MismatchKind::Key {
                        expected: expected.key.clone(),
                        actual: actual.key.clone(),
                    },
                });
            }
            let deviation_ms = actual.time_diff.abs_diff(expected.time_diff);
            (deviation_ms >= tolerance_ms).then(|| Mismatch {
                index,
                kind: MismatchKind::Timing {
                    expected_ms: expected.time_diff,
                    actual_ms: actual.time_diff,
                    deviation_ms,
                },
            })
        })
        .collect();

    let outcome = if mismatches.is_empty() {
        MatchOutcome::Match
    } else {
        MatchOutcome::Mismatch { mismatches }
    };

    MatchReport {
        outcome,
        tolerance_ms,
        compared: candidate.len(),
    }
}
