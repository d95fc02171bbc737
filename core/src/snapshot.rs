use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the presentation layer needs to draw one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    pub is_mine: bool,
    pub adjacent_count: Option<u8>,
}

impl CellView {
    /// A flag placed on a cell without a mine, shown once the game is over.
    pub const fn is_misflagged(&self) -> bool {
        self.flagged && !self.is_mine
    }
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        Self {
            revealed: cell.is_revealed(),
            flagged: cell.is_flagged(),
            is_mine: cell.is_mine(),
            adjacent_count: cell.adjacent_count(),
        }
    }
}

/// Read-only copy of a board, taken once per frame or tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub side: Coord,
    pub mine_count: CellCount,
    pub difficulty: Option<Difficulty>,
    pub elapsed_secs: u32,
    pub outcome: Outcome,
    pub mines_left: i32,
    pub cells: Array2<CellView>,
}

impl Snapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            side: board.side(),
            mine_count: board.mine_count(),
            difficulty: board.difficulty(),
            elapsed_secs: board.elapsed_secs(),
            outcome: board.outcome(),
            mines_left: board.mines_left(),
            cells: board.cells().map(CellView::from),
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&CellView> {
        self.cells.get(coords.to_nd_index())
    }
}
