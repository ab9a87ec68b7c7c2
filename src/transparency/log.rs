//! Transparency log.
//!
//! Counts what the tool recorded and decided so a user can audit it. Only
//! counts are kept; no keys or timings are written here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Running counters for the current session.
#[derive(Debug)]
pub struct TransparencyLog {
    /// Number of key presses recorded
    keystrokes: AtomicU64,
    /// Number of patterns trained
    patterns_trained: AtomicU64,
    /// Number of verifications that matched
    verifications_accepted: AtomicU64,
    /// Number of verifications that did not match
    verifications_rejected: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl TransparencyLog {
    pub fn new() -> Self {
        Self {
            keystrokes: AtomicU64::new(0),
            patterns_trained: AtomicU64::new(0),
            verifications_accepted: AtomicU64::new(0),
            verifications_rejected: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a log that loads from and saves to `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("Could not load previous transparency stats: {e}");
        }

        log
    }

    pub fn record_keystrokes(&self, count: u64) {
        self.keystrokes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_pattern_trained(&self) {
        self.patterns_trained.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a verification.
    pub fn record_verification(&self, accepted: bool) {
        let counter = if accepted {
            &self.verifications_accepted
        } else {
            &self.verifications_rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats {
            keystrokes: self.keystrokes.load(Ordering::Relaxed),
            patterns_trained: self.patterns_trained.load(Ordering::Relaxed),
            verifications_accepted: self.verifications_accepted.load(Ordering::Relaxed),
            verifications_rejected: self.verifications_rejected.load(Ordering::Relaxed),
            session_start: self.session_start,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Cadence Statistics:\n\
             - Keystrokes recorded: {}\n\
             - Patterns trained: {}\n\
             - Verifications accepted: {}\n\
             - Verifications rejected: {}\n\
             \n\
             Note: trained patterns are stored unencrypted.\n\
             A cadence match is a similarity check, not proof of identity.",
            stats.keystrokes,
            stats.patterns_trained,
            stats.verifications_accepted,
            stats.verifications_rejected,
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                keystrokes: stats.keystrokes,
                patterns_trained: stats.patterns_trained,
                verifications_accepted: stats.verifications_accepted,
                verifications_rejected: stats.verifications_rejected,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.keystrokes
                    .store(persisted.keystrokes, Ordering::Relaxed);
                self.patterns_trained
                    .store(persisted.patterns_trained, Ordering::Relaxed);
                self.verifications_accepted
                    .store(persisted.verifications_accepted, Ordering::Relaxed);
                self.verifications_rejected
                    .store(persisted.verifications_rejected, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.keystrokes.store(0, Ordering::Relaxed);
        self.patterns_trained.store(0, Ordering::Relaxed);
        self.verifications_accepted.store(0, Ordering::Relaxed);
        self.verifications_rejected.store(0, Ordering::Relaxed);
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of transparency statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransparencyStats {
    pub keystrokes: u64,
    pub patterns_trained: u64,
    pub verifications_accepted: u64,
    pub verifications_rejected: u64,
    pub session_start: DateTime<Utc>,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    keystrokes: u64,
    patterns_trained: u64,
    verifications_accepted: u64,
    verifications_rejected: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared transparency log.
pub type SharedTransparencyLog = Arc<TransparencyLog>;

pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedTransparencyLog {
    Arc::new(TransparencyLog::with_persistence(path))
}
