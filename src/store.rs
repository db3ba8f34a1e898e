//! Persistence of per-account scores, keyed by account name and game mode.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::score::GameMode;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode scores: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode scores: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// External score persistence used when a game ends.
pub trait ScoreRepository {
    /// Current score, or `None` when the account has no record yet.
    fn fetch(&mut self, account: &str, mode: GameMode) -> Result<Option<i64>, StoreError>;
    fn store(&mut self, account: &str, mode: GameMode, score: i64) -> Result<(), StoreError>;
}

type ScoreTable = BTreeMap<(String, GameMode), i64>;

/// In-memory store, handy for tests and one-off sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    scores: ScoreTable,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl ScoreRepository for MemoryScoreStore {
    fn fetch(&mut self, account: &str, mode: GameMode) -> Result<Option<i64>, StoreError> {
        Ok(self.scores.get(&(account.to_string(), mode)).copied())
    }

    fn store(&mut self, account: &str, mode: GameMode, score: i64) -> Result<(), StoreError> {
        self.scores.insert((account.to_string(), mode), score);
        Ok(())
    }
}

/// Store backed by a bincode file, rewritten on every update.
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    scores: ScoreTable,
}

impl FileScoreStore {
    /// Opens the file at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let scores = match fs::read(&path) {
            Ok(bytes) => {
                let (scores, _): (ScoreTable, usize) =
                    bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
                scores
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => ScoreTable::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), records = scores.len(), "score file opened");
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = bincode::serde::encode_to_vec(&self.scores, bincode::config::standard())?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl ScoreRepository for FileScoreStore {
    fn fetch(&mut self, account: &str, mode: GameMode) -> Result<Option<i64>, StoreError> {
        Ok(self.scores.get(&(account.to_string(), mode)).copied())
    }

    fn store(&mut self, account: &str, mode: GameMode, score: i64) -> Result<(), StoreError> {
        self.scores.insert((account.to_string(), mode), score);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_through_disk() -> Result<(), StoreError> {
        let path = std::env::temp_dir().join(format!("unobot-scores-{}.bin", std::process::id()));
        let _ = fs::remove_file(&path);
        {
            let mut store = FileScoreStore::open(&path)?;
            assert_eq!(store.fetch("bob", GameMode::Evaluate)?, None);
            store.store("bob", GameMode::Evaluate, 42)?;
        }
        let mut reopened = FileScoreStore::open(&path)?;
        assert_eq!(reopened.fetch("bob", GameMode::Evaluate)?, Some(42));
        assert_eq!(reopened.fetch("bob", GameMode::Rating)?, None);
        fs::remove_file(&path)?;
        Ok(())
    }
}
