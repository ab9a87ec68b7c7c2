//! Core functionality: cadence tracking and comparison.
//!
//! This module contains:
//! - The session tracker that records and verifies keystroke rhythm
//! - Detailed position-by-position matching
//! - Rhythm statistics for a pattern

pub mod matching;
pub mod summary;
pub mod tracker;

// Re-export commonly used types
pub use matching::{compare, MatchOutcome, MatchReport, Mismatch, MismatchKind};
pub use summary::CadenceSummary;
pub use tracker::{CadenceTracker, SharedTracker, DEFAULT_TOLERANCE_MS};
