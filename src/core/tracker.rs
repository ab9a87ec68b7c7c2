//! Keystroke cadence tracking.
//!
//! A `CadenceTracker` turns a stream of timestamped key presses into a
//! pattern of `(key, gap)` pairs and compares it against a trained pattern.
//!
//! The tracker never reads a clock on its own except at construction and
//! reset. Every press carries its own instant, so callers control timing.

use crate::capture::types::{KeyEvent, Pattern};
use crate::core::matching::{self, MatchReport};
use crate::core::summary::CadenceSummary;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// Tolerance used by [`CadenceTracker::verify`], in milliseconds.
pub const DEFAULT_TOLERANCE_MS: u64 = 200;

/// Records the rhythm of one typing session.
#[derive(Debug, Clone)]
pub struct CadenceTracker {
    /// Recorded keystrokes, oldest first
    log: Vec<KeyEvent>,
    /// Instant of the latest keystroke, or of session start
    last_timestamp: DateTime<Utc>,
    /// Whether negative gaps are clamped to zero
    clamp_negative: bool,
}

impl CadenceTracker {
    /// Start an empty session now.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Start an empty session at a given instant.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            log: Vec::new(),
            last_timestamp: start,
            clamp_negative: false,
        }
    }

    /// Clamp gaps to zero when a press arrives earlier than the previous one.
    ///
    /// Off by default: out-of-order instants produce negative gaps.
    pub fn clamp_negative_deltas(mut self, clamp: bool) -> Self {
        self.clamp_negative = clamp;
        self
    }

    /// Record a key press observed at `now`.
    pub fn record_key_press(&mut self, key: impl Into<String>, now: DateTime<Utc>) {
        let key = key.into();
        let mut time_diff = (now - self.last_timestamp).num_milliseconds();

        if time_diff < 0 {
            tracing::warn!(
                key = %key,
                time_diff,
                clamped = self.clamp_negative,
                "key press is earlier than the previous one"
            );
            if self.clamp_negative {
                time_diff = 0;
            }
        }

        tracing::debug!(key = %key, time_diff, position = self.log.len(), "recorded key press");
        self.log.push(KeyEvent { key, time_diff });
        self.last_timestamp = now;
    }

    /// Snapshot of the recorded pattern.
    pub fn train(&self) -> Pattern {
        self.log.clone()
    }

    /// Same as [`train`](Self::train).
    pub fn get_pattern(&self) -> Pattern {
        self.train()
    }

    /// Compare the session against `reference` with the default tolerance.
    pub fn verify(&self, reference: &[KeyEvent]) -> bool {
        self.verify_within(reference, DEFAULT_TOLERANCE_MS)
    }

    /// Compare the session against `reference`.
    ///
    /// Lengths must match, keys must match exactly, and every gap must
    /// differ from the reference gap by strictly less than `tolerance_ms`.
    pub fn verify_within(&self, reference: &[KeyEvent], tolerance_ms: u64) -> bool {
        let accepted = self.log.len() == reference.len()
            && self.log.iter().zip(reference).all(|(current, expected)| {
                current.key == expected.key
                    && current.time_diff.abs_diff(expected.time_diff) < tolerance_ms
            });

        tracing::debug!(
            accepted,
            recorded = self.log.len(),
            reference = reference.len(),
            tolerance_ms,
            "verified cadence"
        );
        accepted
    }

    /// Explain how the session compares against `reference`.
    pub fn report(&self, reference: &[KeyEvent], tolerance_ms: u64) -> MatchReport {
        matching::compare(&self.log, reference, tolerance_ms)
    }

    /// Rhythm statistics for the current session.
    pub fn summary(&self) -> CadenceSummary {
        CadenceSummary::from_pattern(&self.log)
    }

    /// Clear the session and restart timing now.
    pub fn reset(&mut self) {
        self.reset_at(Utc::now());
    }

    /// Clear the session and restart timing at `now`.
    pub fn reset_at(&mut self, now: DateTime<Utc>) {
        tracing::debug!(discarded = self.log.len(), "reset cadence session");
        self.log.clear();
        self.last_timestamp = now;
    }

    /// Number of recorded keystrokes.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Instant of the latest keystroke, or of session start.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }
}

impl Default for CadenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A tracker shared between threads behind a single lock.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<CadenceTracker>>,
}

impl SharedTracker {
    pub fn new(tracker: CadenceTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CadenceTracker> {
        // Every tracker method leaves the state consistent, so a poisoned
        // lock still guards valid data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record_key_press(&self, key: impl Into<String>, now: DateTime<Utc>) {
        self.lock().record_key_press(key, now);
    }

    pub fn train(&self) -> Pattern {
        self.lock().train()
    }

    pub fn get_pattern(&self) -> Pattern {
        self.lock().get_pattern()
    }

    pub fn verify(&self, reference: &[KeyEvent]) -> bool {
        self.lock().verify(reference)
    }

    pub fn verify_within(&self, reference: &[KeyEvent], tolerance_ms: u64) -> bool {
        self.lock().verify_within(reference, tolerance_ms)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn reset_at(&self, now: DateTime<Utc>) {
        self.lock().reset_at(now);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ms(start: DateTime<Utc>, offset: i64) -> DateTime<Utc> {
        start + Duration::milliseconds(offset)
    }

    fn typed(keys: &[(&str, i64)]) -> (CadenceTracker, DateTime<Utc>) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        for (key, offset) in keys {
            tracker.record_key_press(*key, ms(start, *offset));
        }
        (tracker, start)
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker = CadenceTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.train().is_empty());
        assert!(tracker.get_pattern().is_empty());
    }

    #[test]
    fn test_records_gaps_between_presses() {
        let (tracker, _) = typed(&[("h", 0), ("i", 120), ("!", 300)]);

        assert_eq!(
            tracker.train(),
            vec![
                KeyEvent::new("h", 0),
                KeyEvent::new("i", 120),
                KeyEvent::new("!", 180),
            ]
        );
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_first_gap_measured_from_start() {
        let (tracker, start) = typed(&[("a", 450)]);

        assert_eq!(tracker.train()[0].time_diff, 450);
        assert_eq!(tracker.last_timestamp(), ms(start, 450));
    }

    #[test]
    fn test_train_returns_independent_copy() {
        let (tracker, _) = typed(&[("a", 10), ("b", 20)]);

        let mut copy = tracker.train();
        copy[0].key = "z".to_string();
        copy.push(KeyEvent::new("c", 5));

        assert_eq!(
            tracker.train(),
            vec![KeyEvent::new("a", 10), KeyEvent::new("b", 10)]
        );
        assert_eq!(tracker.train(), tracker.get_pattern());
    }

    #[test]
    fn test_verify_self_match() {
        let (tracker, _) = typed(&[("p", 80), ("w", 200), ("d", 260)]);
        let trained = tracker.train();

        assert!(tracker.verify(&trained));
        assert!(tracker.verify_within(&trained, 1));
    }

    #[test]
    fn test_verify_length_mismatch() {
        let (tracker, _) = typed(&[("a", 0), ("b", 100)]);
        let reference = vec![
            KeyEvent::new("a", 0),
            KeyEvent::new("b", 100),
            KeyEvent::new("c", 100),
        ];

        assert!(!tracker.verify_within(&reference, u64::MAX));
    }

    #[test]
    fn test_verify_tolerance_is_strict() {
        let (tracker, _) = typed(&[("a", 150)]);
        let reference = vec![KeyEvent::new("a", 100)];

        assert!(!tracker.verify_within(&reference, 50));
        assert!(tracker.verify_within(&reference, 51));
    }

    #[test]
    fn test_verify_default_tolerance() {
        let (tracker, _) = typed(&[("a", 299)]);

        assert!(tracker.verify(&[KeyEvent::new("a", 100)]));
        assert!(!tracker.verify(&[KeyEvent::new("a", 99)]));
    }

    #[test]
    fn test_verify_key_mismatch() {
        let (tracker, _) = typed(&[("b", 100)]);

        assert!(!tracker.verify(&[KeyEvent::new("a", 100)]));
    }

    #[test]
    fn test_verify_empty_matches_empty() {
        let tracker = CadenceTracker::new();
        assert!(tracker.verify(&[]));
        assert!(tracker.verify_within(&[], 0));
    }

    #[test]
    fn test_reset_clears_and_restarts_timing() {
        let (mut tracker, start) = typed(&[("a", 0), ("b", 100)]);

        tracker.reset_at(ms(start, 5_000));
        assert!(tracker.train().is_empty());

        tracker.record_key_press("c", ms(start, 5_070));
        assert_eq!(tracker.train(), vec![KeyEvent::new("c", 70)]);
    }

    #[test]
    fn test_reset_uses_current_instant() {
        let mut tracker = CadenceTracker::starting_at(Utc::now() - Duration::hours(1));
        tracker.reset();

        assert!(Utc::now() - tracker.last_timestamp() < Duration::minutes(1));
    }

    #[test]
    fn test_negative_gap_passes_through() {
        let (tracker, _) = typed(&[("a", 500), ("b", 300)]);
        assert_eq!(tracker.train()[1].time_diff, -200);
    }

    #[test]
    fn test_negative_gap_clamped() {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start).clamp_negative_deltas(true);
        tracker.record_key_press("a", ms(start, 500));
        tracker.record_key_press("b", ms(start, 300));
        tracker.record_key_press("c", ms(start, 400));

        let diffs: Vec<i64> = tracker.train().iter().map(|e| e.time_diff).collect();
        assert_eq!(diffs, vec![500, 0, 100]);
    }

    #[test]
    fn test_hi_scenario() {
        let (trained, _) = typed(&[("h", 0), ("i", 120)]);
        let reference = trained.train();

        let (attempt, _) = typed(&[("h", 0), ("i", 140)]);
        assert!(attempt.verify_within(&reference, 30));
        assert!(!attempt.verify_within(&reference, 15));
    }

    #[test]
    fn test_report_agrees_with_verify() {
        let (tracker, _) = typed(&[("a", 100), ("b", 250)]);
        let reference = vec![KeyEvent::new("a", 100), KeyEvent::new("b", 100)];

        for tolerance in [0, 50, 51, 200] {
            assert_eq!(
                tracker.report(&reference, tolerance).is_match(),
                tracker.verify_within(&reference, tolerance)
            );
        }
    }

    #[test]
    fn test_shared_tracker() {
        let start = Utc::now();
        let shared = SharedTracker::new(CadenceTracker::starting_at(start));
        let other = shared.clone();

        std::thread::spawn(move || {
            other.record_key_press("a", ms(start, 40));
            other.record_key_press("b", ms(start, 90));
        })
        .join()
        .unwrap();

        assert_eq!(shared.len(), 2);
        let trained = shared.train();
        assert!(shared.verify(&trained));
        assert!(shared.verify_within(&shared.get_pattern(), 1));

        shared.reset_at(ms(start, 1_000));
        assert!(shared.is_empty());
    }
}
