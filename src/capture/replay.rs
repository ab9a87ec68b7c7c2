//! Parsing of recorded keystroke logs.
//!
//! A log has one press per line: `<millis> <key>`, where `millis` is the
//! offset from session start. A single space or tab separates the two, and
//! everything after it is the key, verbatim. The space bar is therefore
//! written as the offset followed by two spaces. Blank lines and `#`
//! comments are skipped.
//!
//! ```text
//! # typed "hi you"
//! 0 h
//! 120 i
//! 260  
//! 410 y
//! 500 o
//! 590 u
//! ```

use crate::capture::types::KeyPress;
use chrono::{DateTime, Duration, Utc};

/// Errors from parsing a keystroke log.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// A line that is neither blank, a comment, nor `<millis> <key>`
    InvalidLine { line: usize, content: String },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::InvalidLine { line, content } => {
                write!(f, "Invalid keystroke on line {line}: {content:?}")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// Parse a keystroke log into presses anchored at `start`.
pub fn parse_log(text: &str, start: DateTime<Utc>) -> Result<Vec<KeyPress>, ReplayError> {
    let mut presses = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = || ReplayError::InvalidLine {
            line: idx + 1,
            content: raw.to_string(),
        };

        let (offset, key) = line.split_once([' ', '\t']).ok_or_else(invalid)?;
        let offset: u32 = offset.parse().map_err(|_| invalid())?;
        if key.is_empty() {
            return Err(invalid());
        }

        presses.push(KeyPress::at(
            key,
            start + Duration::milliseconds(i64::from(offset)),
        ));
    }

    Ok(presses)
}
