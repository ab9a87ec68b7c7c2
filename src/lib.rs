//! Cadence Tracker - keystroke rhythm capture and verification.
//!
//! Records the gaps between key presses on an input and checks whether a
//! later typing sample follows the same rhythm within a tolerance.
//!
//! # Not an authentication primitive
//!
//! - Patterns are plain data: no hashing, salting or encryption
//! - No replay resistance and no rate limiting
//! - A match only says two samples have a similar cadence
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Cadence Tracker                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌──────────────┐    │
//! │  │ Key source │──▶│   KeyFeed    │──▶│   Cadence    │    │
//! │  │  (host)    │   │  (channel)   │   │   Tracker    │    │
//! │  └────────────┘   └──────────────┘   └──────────────┘    │
//! │                                       │           │      │
//! │                                       ▼           ▼      │
//! │                               ┌────────────┐ ┌─────────┐ │
//! │                               │  Pattern   │ │ Verify  │ │
//! │                               │  (train)   │ │ report  │ │
//! │                               └────────────┘ └─────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cadence_tracker::CadenceTracker;
//! use chrono::{Duration, Utc};
//!
//! let start = Utc::now();
//! let mut tracker = CadenceTracker::starting_at(start);
//! tracker.record_key_press("h", start);
//! tracker.record_key_press("i", start + Duration::milliseconds(120));
//! let trained = tracker.train();
//!
//! tracker.reset_at(start);
//! tracker.record_key_press("h", start);
//! tracker.record_key_press("i", start + Duration::milliseconds(140));
//!
//! assert!(tracker.verify_within(&trained, 30));
//! assert!(!tracker.verify_within(&trained, 15));
//! ```

pub mod capture;
pub mod config;
pub mod core;
pub mod store;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use capture::{KeyEvent, KeyFeed, KeyPress, Pattern};
pub use config::Config;
pub use crate::core::{
    compare, CadenceSummary, CadenceTracker, MatchReport, SharedTracker, DEFAULT_TOLERANCE_MS,
};
pub use store::{PatternStore, StoreError, StoredPattern};
pub use transparency::{SharedTransparencyLog, TransparencyLog, TransparencyStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
