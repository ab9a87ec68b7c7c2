//! Demonstration of cadence training and verification.
//!
//! This example shows how to:
//! 1. Hand a `KeyFeed` sender to a key-press source running on another thread
//! 2. Record the presses into a tracker and train a pattern
//! 3. Type again with a slightly different rhythm and verify it
//!
//! Run with: cargo run --example replay_demo

use std::thread;
use std::time::Duration;

use cadence_tracker::{
    capture::{KeyFeed, KeyPress},
    core::{CadenceSummary, CadenceTracker},
    transparency::TransparencyLog,
};

/// Simulate a typist: press each key after sleeping for its gap.
fn type_word(feed: &KeyFeed, keys: &[(&'static str, u64)]) {
    let sender = feed.sender();
    let keys = keys.to_vec();
    thread::spawn(move || {
        for (key, gap_ms) in keys {
            thread::sleep(Duration::from_millis(gap_ms));
            if sender.send(KeyPress::now(key)).is_err() {
                break;
            }
        }
    })
    .join()
    .expect("Typist thread panicked");
}

fn main() {
    println!("Cadence Tracker - Replay Demo");
    println!("=============================");
    println!();

    let feed = KeyFeed::new();
    let transparency_log = TransparencyLog::new();

    // Training sample
    let mut tracker = CadenceTracker::new();
    type_word(&feed, &[("p", 50), ("a", 120), ("s", 90), ("s", 160)]);
    let recorded = feed.drain_into(&mut tracker);
    transparency_log.record_keystrokes(recorded as u64);

    let trained = tracker.train();
    transparency_log.record_pattern_trained();
    println!("Trained pattern:");
    for event in &trained {
        println!("  {:<4} {:>5}ms", event.key, event.time_diff);
    }
    let summary = CadenceSummary::from_pattern(&trained);
    println!(
        "  mean gap {:.1}ms, std dev {:.1}ms",
        summary.mean_gap_ms, summary.gap_std_dev_ms
    );
    println!();

    // Second attempt, a little slower on the last key
    tracker.reset();
    type_word(&feed, &[("p", 50), ("a", 130), ("s", 85), ("s", 230)]);
    let recorded = feed.drain_into(&mut tracker);
    transparency_log.record_keystrokes(recorded as u64);

    for tolerance in [200, 40] {
        let report = tracker.report(&trained, tolerance);
        transparency_log.record_verification(report.is_match());
        println!("Tolerance {tolerance}ms -> {report}");
    }

    println!();
    println!("{}", transparency_log.summary());
}
