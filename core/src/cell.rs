use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// State of a single grid position.
///
/// The mine is fixed at construction. Everything else changes through the board's intents, and a
/// cell is never revealed and flagged at the same time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    adjacent_count: Option<u8>,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const fn new(has_mine: bool) -> Self {
        Self {
            has_mine,
            adjacent_count: None,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Number of mines around this cell, `None` until it has been computed.
    pub const fn adjacent_count(&self) -> Option<u8> {
        self.adjacent_count
    }

    /// Returns `false` when the cell is flagged, flags have to be removed first.
    pub fn mark_revealed(&mut self) -> bool {
        if self.flagged {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Returns `false` when the cell is already revealed.
    pub fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }

    pub fn set_adjacent_count(&mut self, count: u8) -> Result<()> {
        match self.adjacent_count {
            Some(current) if current != count => Err(GameError::InvalidState),
            _ => {
                self.adjacent_count = Some(count);
                Ok(())
            }
        }
    }
}
