//! Integration tests for cadence tracking and verification

use cadence_tracker::capture::{parse_log, KeyFeed};
use cadence_tracker::{CadenceTracker, KeyEvent, PatternStore, StoredPattern};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

fn at(start: DateTime<Utc>, offset_ms: i64) -> DateTime<Utc> {
    start + Duration::milliseconds(offset_ms)
}

/// Record `(key, gap)` pairs as presses spaced by those gaps.
fn record(tracker: &mut CadenceTracker, start: DateTime<Utc>, presses: &[(String, u16)]) {
    let mut offset = 0i64;
    for (key, gap) in presses {
        offset += i64::from(*gap);
        tracker.record_key_press(key.clone(), at(start, offset));
    }
}

fn presses() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{1,3}", 0u16..2_000), 0..24)
}

proptest! {
    #[test]
    fn train_length_counts_presses_since_reset(before in presses(), after in presses()) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &before);
        prop_assert_eq!(tracker.train().len(), before.len());

        let restart = at(start, 100_000_000);
        tracker.reset_at(restart);
        record(&mut tracker, restart, &after);
        prop_assert_eq!(tracker.train().len(), after.len());
    }

    #[test]
    fn gaps_match_recorded_spacing(sample in presses()) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &sample);

        let expected: Vec<KeyEvent> = sample
            .iter()
            .map(|(k, gap)| KeyEvent::new(k.clone(), i64::from(*gap)))
            .collect();
        prop_assert_eq!(tracker.train(), expected);
    }

    #[test]
    fn reads_are_idempotent_and_independent(sample in presses()) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &sample);

        let first = tracker.train();
        let mut second = tracker.get_pattern();
        prop_assert_eq!(&first, &second);

        second.push(KeyEvent::new("extra", 1));
        second.iter_mut().for_each(|e| e.time_diff += 1);
        prop_assert_eq!(tracker.train(), first);
    }

    #[test]
    fn trained_pattern_verifies_against_itself(sample in presses(), tolerance in 1u64..10_000) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &sample);

        let trained = tracker.train();
        prop_assert!(tracker.verify_within(&trained, tolerance));
        prop_assert!(tracker.verify(&trained));
    }

    #[test]
    fn report_agrees_with_verify(
        current in presses(),
        reference in presses(),
        tolerance in 0u64..3_000,
    ) {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &current);

        let mut other = CadenceTracker::starting_at(start);
        record(&mut other, start, &reference);
        let reference = other.train();

        prop_assert_eq!(
            tracker.report(&reference, tolerance).is_match(),
            tracker.verify_within(&reference, tolerance)
        );
    }

    #[test]
    fn length_mismatch_always_rejects(sample in presses(), extra in "[a-z]") {
        let start = Utc::now();
        let mut tracker = CadenceTracker::starting_at(start);
        record(&mut tracker, start, &sample);

        let mut longer = tracker.train();
        longer.push(KeyEvent::new(extra, 0));
        prop_assert!(!tracker.verify_within(&longer, u64::MAX));
    }
}

#[test]
fn test_tolerance_boundary_with_other_positions_matching() {
    let start = Utc::now();
    let mut tracker = CadenceTracker::starting_at(start);
    tracker.record_key_press("a", at(start, 100));
    tracker.record_key_press("b", at(start, 250));
    tracker.record_key_press("c", at(start, 350));

    let reference = vec![
        KeyEvent::new("a", 100),
        KeyEvent::new("b", 100),
        KeyEvent::new("c", 100),
    ];
    assert!(!tracker.verify_within(&reference, 50));
    assert!(tracker.verify_within(&reference, 51));
}

#[test]
fn test_key_mismatch_with_exact_timing() {
    let start = Utc::now();
    let mut tracker = CadenceTracker::starting_at(start);
    tracker.record_key_press("b", at(start, 100));

    assert!(!tracker.verify_within(&[KeyEvent::new("a", 100)], u64::MAX));
}

#[test]
fn test_train_then_verify_from_logs() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = PatternStore::new(dir.path());

    let start = Utc::now();
    let mut tracker = CadenceTracker::starting_at(start);
    let feed = KeyFeed::new();
    for press in parse_log("0 h\n120 i\n", start).expect("Failed to parse log") {
        feed.sender().send(press).expect("Feed closed");
    }
    feed.drain_into(&mut tracker);

    store
        .save(&StoredPattern::new("hi", tracker.train()))
        .expect("Failed to save pattern");
    let trained = store.load("hi").expect("Failed to load pattern").pattern;
    assert_eq!(trained, vec![KeyEvent::new("h", 0), KeyEvent::new("i", 120)]);

    let later = at(start, 60_000);
    tracker.reset_at(later);
    for press in parse_log("0 h\n140 i\n", later).expect("Failed to parse log") {
        tracker.record_key_press(press.key, press.at);
    }

    assert!(tracker.verify_within(&trained, 30));
    assert!(!tracker.verify_within(&trained, 15));

    let report = tracker.report(&trained, 15);
    assert_eq!(report.mismatches().len(), 1);
    assert_eq!(report.mismatches()[0].index, 1);
}
