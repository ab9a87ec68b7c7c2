//! Storage of trained patterns as JSON files, one per name.
//!
//! Patterns are stored in plain text. Nothing here hashes or protects them.

use crate::capture::types::Pattern;
use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A trained pattern with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPattern {
    pub id: Uuid,
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Tolerance to verify against, if chosen at training time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_ms: Option<u64>,
    pub pattern: Pattern,
}

impl StoredPattern {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            trained_at: Utc::now(),
            tolerance_ms: None,
            pattern,
        }
    }

    pub fn with_tolerance(mut self, tolerance_ms: Option<u64>) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }

    /// Tolerance to verify with: an explicit override wins, then the
    /// tolerance saved at training time, then the configured default.
    pub fn effective_tolerance(&self, requested_ms: Option<u64>, config: &Config) -> u64 {
        requested_ms
            .or(self.tolerance_ms)
            .unwrap_or(config.default_tolerance_ms)
    }
}

/// Pattern store errors.
#[derive(Debug)]
pub enum StoreError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    NotFound(String),
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {e}"),
            StoreError::ParseError(e) => write!(f, "Parse error: {e}"),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            StoreError::NotFound(name) => write!(f, "No trained pattern named '{name}'"),
            StoreError::InvalidName(name) => write!(
                f,
                "Invalid pattern name '{name}' (use letters, digits, '-' and '_')"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Directory of named patterns.
#[derive(Debug, Clone)]
pub struct PatternStore {
    dir: PathBuf,
}

impl PatternStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a pattern, replacing any pattern with the same name.
    pub fn save(&self, stored: &StoredPattern) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&stored.name)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::IoError(e.to_string()))?;

        let json = serde_json::to_string_pretty(stored)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| StoreError::IoError(e.to_string()))?;

        tracing::debug!(name = %stored.name, path = %path.display(), "saved pattern");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<StoredPattern, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| StoreError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StoreError::ParseError(e.to_string()))
    }

    /// Names of all stored patterns, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| StoreError::IoError(e.to_string()))?;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|name| is_valid_name(name))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| StoreError::IoError(e.to_string()))
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
