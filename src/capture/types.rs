//! Keystroke types shared by the tracker and its event sources.
//!
//! A `KeyPress` is what an input source observes. A `KeyEvent` is what the
//! tracker keeps: the key plus the gap since the previous press.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded keystroke in a cadence pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Symbolic identifier of the pressed key
    pub key: String,
    /// Milliseconds since the previous keystroke (or session start)
    #[serde(rename = "timeDiff")]
    pub time_diff: i64,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, time_diff: i64) -> Self {
        Self {
            key: key.into(),
            time_diff,
        }
    }
}

/// An ordered typing sample. Position `i` of a trained pattern aligns with
/// position `i` of a candidate.
pub type Pattern = Vec<KeyEvent>;

/// A raw key press as delivered by an event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Symbolic identifier of the pressed key
    pub key: String,
    /// When the key went down
    pub at: DateTime<Utc>,
}

impl KeyPress {
    /// A press observed right now.
    pub fn now(key: impl Into<String>) -> Self {
        Self::at(key, Utc::now())
    }

    pub fn at(key: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            at,
        }
    }
}
