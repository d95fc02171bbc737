use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Difficulty;

pub use store::*;

mod format;
mod store;

/// Number of ranked slots kept per difficulty.
pub const LEADERBOARD_SLOTS: usize = 5;

/// Separates the name from the time in the high score file, so names cannot contain it.
pub const NAME_DELIMITER: char = ':';

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Invalid name {0:?}, names must not be empty or contain ':' or line breaks")]
    InvalidName(String),
    #[error("No unnamed score at rank {rank} for {difficulty}")]
    NoPendingEntry { difficulty: Difficulty, rank: usize },
    #[error("Malformed high score file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Could not access high score file")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, LeaderboardError>;

/// One ranked time. The name stays empty until the player provides it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: Option<String>,
    pub seconds: u32,
}

impl ScoreEntry {
    pub fn named(name: impl Into<String>, seconds: u32) -> Self {
        Self {
            name: Some(name.into()),
            seconds,
        }
    }

    pub const fn pending(seconds: u32) -> Self {
        Self {
            name: None,
            seconds,
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.name.is_none()
    }
}

/// Best times per difficulty, fastest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    ranks: [Vec<ScoreEntry>; 3],
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        &self.ranks[difficulty as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.iter().all(Vec::is_empty)
    }

    /// Whether `seconds` would make it onto the board for `difficulty`.
    pub fn qualifies(&self, difficulty: Difficulty, seconds: u32) -> bool {
        let entries = self.entries(difficulty);
        match entries.get(LEADERBOARD_SLOTS - 1) {
            Some(last) => seconds < last.seconds,
            None => true,
        }
    }

    /// Inserts a pending entry for `seconds` and returns its 1-based rank, or `None` if the time is
    /// not fast enough. Equal times rank behind the ones already recorded.
    pub fn record_if_qualifies(&mut self, difficulty: Difficulty, seconds: u32) -> Option<usize> {
        if !self.qualifies(difficulty, seconds) {
            return None;
        }

        let entries = &mut self.ranks[difficulty as usize];
        let index = entries.partition_point(|entry| entry.seconds <= seconds);
        entries.insert(index, ScoreEntry::pending(seconds));
        if let Some(evicted) = entries.get(LEADERBOARD_SLOTS) {
            log::debug!("{} time of {}s drops off the leaderboard", difficulty, evicted.seconds);
        }
        entries.truncate(LEADERBOARD_SLOTS);

        Some(index + 1)
    }

    /// Names the pending entry at `rank`. The name is trimmed first.
    pub fn assign_name(&mut self, difficulty: Difficulty, rank: usize, name: &str) -> Result<()> {
        let name = validate_name(name)?;

        let entry = rank
            .checked_sub(1)
            .and_then(|index| self.ranks[difficulty as usize].get_mut(index))
            .filter(|entry| entry.is_pending())
            .ok_or(LeaderboardError::NoPendingEntry { difficulty, rank })?;
        entry.name = Some(name.to_owned());
        Ok(())
    }

    pub(crate) fn push_loaded(&mut self, difficulty: Difficulty, entry: ScoreEntry) {
        self.ranks[difficulty as usize].push(entry);
    }
}

/// Trims `name` and checks it can be written to the high score file.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains([NAME_DELIMITER, '\n', '\r']) {
        return Err(LeaderboardError::InvalidName(name.to_owned()));
    }
    Ok(trimmed)
}
