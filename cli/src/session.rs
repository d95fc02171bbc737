use std::time::Instant;

use minesweeper_core::*;

use crate::command::Command;

/// What the front end should show after a command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Board,
    Scores,
    Help,
    NameWanted(PendingName),
    Quit,
}

/// Owns the board and the high scores, and turns wall clock time into timer ticks.
pub(crate) struct Session {
    board: Board,
    store: ScoreStore,
    started_at: Option<Instant>,
    ticks_applied: u64,
}

impl Session {
    pub(crate) fn new(board: Board, store: ScoreStore) -> Self {
        Self {
            board,
            store,
            started_at: None,
            ticks_applied: 0,
        }
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn store(&self) -> &ScoreStore {
        &self.store
    }

    pub(crate) fn apply(&mut self, command: Command, now: Instant) -> Result<Step> {
        self.catch_up(now);

        let step = match command {
            Command::Reveal(coords) => {
                let outcome = self.board.reveal(coords)?;
                log::debug!("Reveal {:?}: {:?}", coords, outcome);
                self.after_intent(now, outcome == RevealOutcome::Won)
            }
            Command::Flag(coords) => {
                let outcome = self.board.toggle_flag(coords)?;
                log::debug!("Flag {:?}: {:?}", coords, outcome);
                self.after_intent(now, outcome == MarkOutcome::Won)
            }
            Command::NewGame => {
                self.board.reset();
                self.stop_clock();
                Step::Board
            }
            Command::SetDifficulty(difficulty) => {
                self.board.set_difficulty(difficulty);
                self.stop_clock();
                Step::Board
            }
            Command::Scores => Step::Scores,
            Command::Help => Step::Help,
            Command::Quit => Step::Quit,
        };
        Ok(step)
    }

    pub(crate) fn assign_name(&mut self, pending: PendingName, name: &str) -> leaderboard::Result<()> {
        self.store.assign_name(pending, name)
    }

    /// Applies one tick for every whole second since the first intent.
    pub(crate) fn catch_up(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        let due = now.saturating_duration_since(started_at).as_secs();
        while self.ticks_applied < due {
            if !self.board.tick() {
                break;
            }
            self.ticks_applied += 1;
        }
    }

    fn after_intent(&mut self, now: Instant, won: bool) -> Step {
        if self.started_at.is_none() && self.board.is_started() {
            self.started_at = Some(now);
        }
        if !won {
            return Step::Board;
        }
        match self.store.record_win(&mut self.board) {
            Some(pending) => Step::NameWanted(pending),
            None => Step::Board,
        }
    }

    fn stop_clock(&mut self) {
        self.started_at = None;
        self.ticks_applied = 0;
    }
}
