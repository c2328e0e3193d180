//! High-score storage backends
//!
//! - `JsonFileStore`: serde_json file on disk
//! - `MemoryStore`: process-local, for tests and headless runs
//! - `UnsupportedStore`: a platform without storage; every call fails with
//!   `StorageError::Unsupported`

use std::fs;
use std::path::{Path, PathBuf};

use crate::highscores::HighScores;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Score storage unsupported: {0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed score file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-10 score persistence
pub trait ScoreStore {
    fn load(&self) -> Result<HighScores, StorageError>;
    fn save(&mut self, scores: &HighScores) -> Result<(), StorageError>;

    /// Load, insert one run and write back. Returns the rank achieved.
    fn submit(&mut self, score: u64, level: u32, timestamp: f64) -> Result<Option<usize>, StorageError> {
        let mut scores = self.load()?;
        let rank = scores.add_score(score, level, timestamp);
        if rank.is_some() {
            self.save(&scores)?;
        }
        Ok(rank)
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<HighScores, StorageError> {
        if !self.path.exists() {
            log::info!("No high scores at {}, starting fresh", self.path.display());
            return Ok(HighScores::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(scores)?;
        fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, StorageError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StorageError> {
        self.scores = scores.clone();
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnsupportedStore;

impl ScoreStore for UnsupportedStore {
    fn load(&self) -> Result<HighScores, StorageError> {
        Err(StorageError::Unsupported("no storage backend".to_string()))
    }

    fn save(&mut self, _scores: &HighScores) -> Result<(), StorageError> {
        Err(StorageError::Unsupported("no storage backend".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("scores").join("highscores.json"));

        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.submit(120, 2, 1.0).unwrap(), Some(1));
        assert_eq!(store.submit(80, 1, 2.0).unwrap(), Some(2));

        let reopened = JsonFileStore::new(store.path());
        let scores = reopened.load().unwrap();
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.len(), 2);
    }

    #[test]
    fn test_zero_score_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("highscores.json"));
        assert_eq!(store.submit(0, 1, 0.0).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.submit(10, 1, 0.0).unwrap();
        store.submit(30, 1, 0.0).unwrap();
        assert_eq!(store.load().unwrap().rows()[..3], [30, 10, 0]);
    }

    #[test]
    fn test_unsupported_store() {
        let mut store = UnsupportedStore;
        assert!(matches!(store.load(), Err(StorageError::Unsupported(_))));
        assert!(store.submit(10, 1, 0.0).is_err());
    }
}
