use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::*;
use crate::Board;

pub const DEFAULT_SCORES_PATH: &str = "highscores.txt";

impl Leaderboard {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// Rewrites the whole file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = io::BufWriter::new(fs::File::create(path)?);
        write!(file, "{}", self)?;
        file.flush()?;
        Ok(())
    }
}

/// Rank waiting for a player name after a win.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingName {
    pub difficulty: Difficulty,
    pub rank: usize,
}

/// How the file looked when the store was opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FileState {
    /// Parsed, or not there yet. Safe to overwrite.
    Clean,
    /// Failed to parse. Moved aside before the first write so nothing is lost.
    Malformed,
    /// Could not be read at all. Never written.
    Unreadable,
}

/// A leaderboard tied to its file. Named scores are written back right away, and a failed
/// write is logged without interrupting the game.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
    leaderboard: Leaderboard,
    file_state: FileState,
}

impl ScoreStore {
    /// Loads the leaderboard at `path`, starting empty when the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (leaderboard, file_state) = match Leaderboard::load(&path) {
            Ok(leaderboard) => {
                log::debug!("Loaded high scores from {}", path.display());
                (leaderboard, FileState::Clean)
            }
            Err(LeaderboardError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("No high score file at {}, starting empty", path.display());
                (Leaderboard::new(), FileState::Clean)
            }
            Err(err @ LeaderboardError::Malformed { .. }) => {
                log::error!(
                    "Ignoring high score file {}: {}",
                    path.display(),
                    error_chain(&err)
                );
                (Leaderboard::new(), FileState::Malformed)
            }
            Err(err) => {
                log::error!(
                    "Cannot read high score file {}, scores will not be saved: {}",
                    path.display(),
                    error_chain(&err)
                );
                (Leaderboard::new(), FileState::Unreadable)
            }
        };
        Self {
            path,
            leaderboard,
            file_state,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a malformed file is moved before it gets replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Ranks the time of a won game. Returns `None` for games that are not won, boards without a
    /// preset difficulty, times that are too slow, and games whose score was already taken.
    pub fn record_win(&mut self, board: &mut Board) -> Option<PendingName> {
        let (difficulty, seconds) = board.claim_score()?;
        let rank = self.record_if_qualifies(difficulty, seconds)?;
        Some(PendingName { difficulty, rank })
    }

    /// The new entry stays in memory until it is named.
    pub fn record_if_qualifies(&mut self, difficulty: Difficulty, seconds: u32) -> Option<usize> {
        let rank = self.leaderboard.record_if_qualifies(difficulty, seconds)?;
        log::debug!("{}s ranks #{} on {}", seconds, rank, difficulty);
        Some(rank)
    }

    /// Invalid names are rejected before anything is stored, so the caller can ask again.
    pub fn assign_name(&mut self, pending: PendingName, name: &str) -> Result<()> {
        self.leaderboard
            .assign_name(pending.difficulty, pending.rank, name)?;
        self.persist();
        Ok(())
    }

    /// Returns whether the file was written.
    pub fn persist(&mut self) -> bool {
        match self.file_state {
            FileState::Clean => {}
            FileState::Unreadable => {
                log::error!(
                    "Not saving high scores over unreadable {}",
                    self.path.display()
                );
                return false;
            }
            FileState::Malformed => {
                let backup = self.backup_path();
                if let Err(err) = fs::rename(&self.path, &backup) {
                    log::error!(
                        "Could not move malformed {} to {}, not saving: {}",
                        self.path.display(),
                        backup.display(),
                        err
                    );
                    return false;
                }
                log::warn!("Moved malformed high score file to {}", backup.display());
                self.file_state = FileState::Clean;
            }
        }

        match self.leaderboard.save(&self.path) {
            Ok(()) => true,
            Err(err) => {
                log::error!(
                    "Could not save high scores to {}: {}",
                    self.path.display(),
                    error_chain(&err)
                );
                false
            }
        }
    }
}

fn error_chain(err: &LeaderboardError) -> String {
    match err {
        LeaderboardError::Io(source) => format!("{}: {}", err, source),
        _ => err.to_string(),
    }
}
