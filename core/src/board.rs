use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// A single game: the grid of cells plus the counters the presentation layer displays.
///
/// Every mutation goes through the intent methods (`reveal`, `toggle_flag`, `reset`,
/// `set_difficulty`, `tick`), each of which runs to completion before returning.
#[derive(Clone, Debug)]
pub struct Board {
    config: GameConfig,
    difficulty: Option<Difficulty>,
    cells: Array2<Cell>,
    flagged_count: CellCount,
    elapsed_secs: u32,
    started: bool,
    outcome: Outcome,
    score_claimed: bool,
    seed_source: SmallRng,
}

impl Board {
    /// Creates a board with randomly placed mines.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed_source(config, SmallRng::from_os_rng())
    }

    /// Same as [`Board::new`] but every layout, including the ones after a reset, follows from
    /// `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_seed_source(config, SmallRng::seed_from_u64(seed))
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut board = Self::from_layout(
            MineLayout::empty(difficulty.config().side),
            SmallRng::from_os_rng(),
        );
        board.set_difficulty(difficulty);
        board
    }

    /// Uses a fixed mine layout for the first game. Resets go back to random placement with the
    /// same dimensions.
    pub fn with_layout(layout: MineLayout) -> Self {
        Self::from_layout(layout, SmallRng::from_os_rng())
    }

    fn with_seed_source(config: GameConfig, seed_source: SmallRng) -> Result<Self> {
        let config = GameConfig::new(config.side, config.mines)?;
        let mut board = Self::from_layout(MineLayout::empty(config.side), seed_source);
        board.config = config;
        board.difficulty = detect_difficulty(config);
        board.reset();
        Ok(board)
    }

    fn from_layout(layout: MineLayout, seed_source: SmallRng) -> Self {
        let config = layout.game_config();
        let mut board = Self {
            config,
            difficulty: detect_difficulty(config),
            cells: Array2::default((config.side, config.side).to_nd_index()),
            flagged_count: 0,
            elapsed_secs: 0,
            started: false,
            outcome: Outcome::InProgress,
            score_claimed: false,
            seed_source,
        };
        board.install_layout(&layout);
        board
    }

    pub fn side(&self) -> Coord {
        self.config.side
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// `None` when the dimensions do not match any of the presets.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mine counter for display, goes negative when there are more flags than mines.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flagged_count)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let side = self.config.side;
        if coords.0 < side && coords.1 < side {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Starts a new game with fresh mines and the same dimensions.
    pub fn reset(&mut self) {
        self.assign_mines();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config = difficulty.config();
        self.difficulty = Some(difficulty);
        self.reset();
    }

    /// Advances the timer by one second. Returns whether the timer is running.
    pub fn tick(&mut self) -> bool {
        if !self.started || self.outcome.is_over() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if self.outcome.is_over() {
            return Ok(RevealOutcome::NoChange);
        }
        self.mark_started();

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_flagged() || cell.is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine() {
            self.cells[coords.to_nd_index()].mark_revealed();
            log::debug!("Mine hit at {:?}", coords);
            self.end_game(Outcome::Lost);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        if self.flagged_count == self.config.mines && self.check_win() {
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        if self.outcome.is_over() {
            return Ok(MarkOutcome::NoChange);
        }
        self.mark_started();

        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.toggle_flag() {
            return Ok(MarkOutcome::NoChange);
        }
        if cell.is_flagged() {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }

        // the win is only evaluated when the flag count matches the mine count exactly, and
        // taking a flag off a board without mines is not a move that can win it
        if self.flagged_count > 0 && self.flagged_count == self.config.mines && self.check_win() {
            Ok(MarkOutcome::Won)
        } else {
            Ok(MarkOutcome::Changed)
        }
    }

    /// Ends the game as won when every mine carries a flag.
    pub fn check_win(&mut self) -> bool {
        if self.outcome.is_over() {
            return self.outcome == Outcome::Won;
        }
        if self.correct_flag_count() == self.config.mines {
            self.end_game(Outcome::Won);
            true
        } else {
            false
        }
    }

    /// Number of cells that are both flagged and mined.
    pub fn correct_flag_count(&self) -> CellCount {
        let count = self
            .cells
            .iter()
            .filter(|cell| cell.is_flagged() && cell.is_mine())
            .count();
        count as CellCount
    }

    /// Hands out the difficulty and time of a won preset game, once per game.
    pub fn claim_score(&mut self) -> Option<(Difficulty, u32)> {
        if self.outcome != Outcome::Won || self.score_claimed {
            return None;
        }
        let difficulty = self.difficulty?;
        self.score_claimed = true;
        Some((difficulty, self.elapsed_secs))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_board(self)
    }

    pub(crate) fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Reveals `start` and keeps going through every neighbor of a zero-count cell.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = vec![start];
        let mut opened: u32 = 0;

        while let Some(coords) = to_visit.pop() {
            let cell = self.cells[coords.to_nd_index()];
            // an already computed count means the cell was visited before
            if cell.is_mine() || cell.is_flagged() || cell.adjacent_count().is_some() {
                continue;
            }

            let count = self.count_adjacent_mines(coords);
            let cell = &mut self.cells[coords.to_nd_index()];
            if let Err(err) = cell.set_adjacent_count(count) {
                log::warn!("Skipping {:?} during reveal: {}", coords, err);
                continue;
            }
            cell.mark_revealed();
            opened += 1;
            log::trace!("Revealed {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                let cells = &self.cells;
                to_visit.extend(cells.iter_neighbors(coords).filter(|&pos| {
                    let neighbor = cells[pos.to_nd_index()];
                    neighbor.adjacent_count().is_none() && !neighbor.is_flagged()
                }));
            }
        }

        log::debug!("Reveal at {:?} opened {} cells", start, opened);
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        let count = self
            .cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_mine())
            .count();
        // at most 8 neighbors
        count as u8
    }

    fn assign_mines(&mut self) {
        let seed = self.seed_source.random();
        let layout = RejectionSampler::new(seed).generate(self.config);
        self.install_layout(&layout);
    }

    fn install_layout(&mut self, layout: &MineLayout) {
        let side = layout.side();
        self.config = layout.game_config();
        self.cells = Array2::from_shape_fn((side, side).to_nd_index(), |(row, col)| {
            Cell::new(layout.contains_mine((row as Coord, col as Coord)))
        });
        self.flagged_count = 0;
        self.elapsed_secs = 0;
        self.started = false;
        self.outcome = Outcome::InProgress;
        self.score_claimed = false;
    }

    fn mark_started(&mut self) {
        if !self.started {
            log::debug!("Game started");
            self.started = true;
        }
    }

    fn end_game(&mut self, outcome: Outcome) {
        if self.outcome.is_over() {
            return;
        }
        self.outcome = outcome;
        log::debug!("Game over: {:?} after {} seconds", outcome, self.elapsed_secs);
    }
}

fn detect_difficulty(config: GameConfig) -> Option<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .find(|difficulty| difficulty.config() == config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(side: Coord, mines: &[Coord2]) -> Board {
        Board::with_layout(MineLayout::from_mine_coords(side, mines).unwrap())
    }

    fn mine_total(board: &Board) -> usize {
        board.cells().iter().filter(|cell| cell.is_mine()).count()
    }

    fn all_coords(side: Coord) -> impl Iterator<Item = Coord2> {
        (0..side).flat_map(move |row| (0..side).map(move |col| (row, col)))
    }

    #[test]
    fn setup_places_exact_mine_count() {
        for difficulty in Difficulty::ALL {
            let mut board = Board::from_difficulty(difficulty);
            assert_eq!(mine_total(&board), usize::from(difficulty.config().mines));

            board.reset();
            assert_eq!(mine_total(&board), usize::from(difficulty.config().mines));
        }

        let board = Board::with_seed(GameConfig::new(5, 7).unwrap(), 3).unwrap();
        assert_eq!(mine_total(&board), 7);
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let too_many = Board::new(GameConfig::new_unchecked(3, 9));
        let empty = Board::new(GameConfig::new_unchecked(0, 0));

        assert_eq!(too_many.err(), Some(GameError::TooManyMines));
        assert_eq!(empty.err(), Some(GameError::InvalidSize));
    }

    #[test]
    fn preset_dimensions_are_detected() {
        let beginner = Board::new(GameConfig::new(9, 10).unwrap()).unwrap();
        let custom = Board::new(GameConfig::new(9, 11).unwrap()).unwrap();

        assert_eq!(beginner.difficulty(), Some(Difficulty::Beginner));
        assert_eq!(custom.difficulty(), None);
    }

    #[test]
    fn seeded_boards_repeat() {
        let config = Difficulty::Expert.config();
        let mut first = Board::with_seed(config, 99).unwrap();
        let mut second = Board::with_seed(config, 99).unwrap();

        assert_eq!(first.cells(), second.cells());

        first.reset();
        second.reset();
        assert_eq!(first.cells(), second.cells());
    }

    #[test]
    fn reset_keeps_difficulty_dimensions() {
        let mut board = Board::from_difficulty(Difficulty::Beginner);

        board.set_difficulty(Difficulty::Intermediate);
        board.reset();

        assert_eq!(board.side(), 16);
        assert_eq!(board.mine_count(), 40);
        assert_eq!(board.difficulty(), Some(Difficulty::Intermediate));
        assert_eq!(mine_total(&board), 40);
    }

    #[test]
    fn revealing_mine_loses_and_freezes_board() {
        let mut board = board(3, &[(0, 0)]);

        assert_eq!(board.reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert_eq!(board.outcome(), Outcome::Lost);
        assert!(board.is_over());
        assert!(board.cell_at((0, 0)).unwrap().is_revealed());

        assert_eq!(board.reveal((2, 2)), Ok(RevealOutcome::NoChange));
        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::NoChange));
        assert!(!board.cell_at((2, 2)).unwrap().is_revealed());
        assert!(!board.cell_at((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn single_mine_scenario_wins_only_after_flagging() {
        let mut board = board(9, &[(0, 0)]);

        assert_eq!(board.reveal((8, 8)), Ok(RevealOutcome::Revealed));

        for coords in all_coords(9) {
            let cell = board.cell_at(coords).unwrap();
            assert_eq!(cell.is_revealed(), coords != (0, 0), "at {:?}", coords);
        }
        assert_eq!(board.outcome(), Outcome::InProgress);

        assert_eq!(board.toggle_flag((0, 0)), Ok(MarkOutcome::Won));
        assert_eq!(board.outcome(), Outcome::Won);
        assert_eq!(board.mines_left(), 0);
    }

    #[test]
    fn revealed_counts_match_neighborhood_and_never_change() {
        let mines = [(0, 1), (2, 2), (3, 0), (4, 4)];
        let mut board = board(5, &mines);
        let layout = MineLayout::from_mine_coords(5, &mines).unwrap();

        for coords in all_coords(5) {
            if !layout.contains_mine(coords) {
                board.reveal(coords).unwrap();
            }
        }

        for coords in all_coords(5) {
            let cell = *board.cell_at(coords).unwrap();
            if cell.is_mine() {
                assert!(!cell.is_revealed());
                continue;
            }
            assert!(cell.is_revealed());
            assert_eq!(cell.adjacent_count(), Some(layout.adjacent_mine_count(coords)));

            assert_eq!(board.reveal(coords), Ok(RevealOutcome::NoChange));
            assert_eq!(*board.cell_at(coords).unwrap(), cell);
        }
    }

    #[test]
    fn cascade_stops_at_numbered_border() {
        // mines split the board into a left zero region and a right part
        let mut board = board(5, &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);

        board.reveal((2, 0)).unwrap();

        for row in 0..5 {
            let zero = board.cell_at((row, 0)).unwrap();
            let border = board.cell_at((row, 1)).unwrap();
            let right = board.cell_at((row, 3)).unwrap();
            assert_eq!(zero.adjacent_count(), Some(0));
            assert!(border.is_revealed());
            assert!(border.adjacent_count().unwrap() > 0);
            assert!(!right.is_revealed());
            assert_eq!(right.adjacent_count(), None);
        }
    }

    #[test]
    fn flagged_cells_are_protected() {
        let mut board = board(4, &[(3, 3)]);

        assert_eq!(board.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(board.reveal((0, 0)), Ok(RevealOutcome::NoChange));
        assert!(!board.cell_at((0, 0)).unwrap().is_revealed());

        // the cascade goes around the flag and leaves it in place
        board.reveal((0, 3)).unwrap();
        let flagged = board.cell_at((0, 0)).unwrap();
        assert!(flagged.is_flagged());
        assert!(!flagged.is_revealed());
        assert!(board.cell_at((1, 1)).unwrap().is_revealed());
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut board = board(3, &[(0, 0)]);

        board.reveal((2, 2)).unwrap();

        assert_eq!(board.toggle_flag((2, 2)), Ok(MarkOutcome::NoChange));
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn board_without_mines_reveals_everything() {
        let mut board = board(22, &[]);

        assert_eq!(board.reveal((11, 11)), Ok(RevealOutcome::Won));

        assert!(board.cells().iter().all(|cell| cell.is_revealed()));
        assert!(board.cells().iter().all(|cell| cell.adjacent_count() == Some(0)));
    }

    #[test]
    fn win_requires_flag_count_to_equal_mine_count() {
        let mut board = board(4, &[(0, 0), (3, 3)]);

        board.toggle_flag((0, 0)).unwrap();
        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::Changed));
        assert_eq!(board.outcome(), Outcome::InProgress);

        // three flags, one too many, so the check never fires
        assert_eq!(board.toggle_flag((3, 3)), Ok(MarkOutcome::Changed));
        assert_eq!(board.outcome(), Outcome::InProgress);
        assert_eq!(board.mines_left(), -1);

        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::Won));
        assert_eq!(board.outcome(), Outcome::Won);
        assert_eq!(board.correct_flag_count(), 2);
    }

    #[test]
    fn unflagging_on_board_without_mines_does_not_win() {
        let mut board = board(3, &[]);

        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::Changed));
        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::Changed));
        assert_eq!(board.outcome(), Outcome::InProgress);
        assert!(board.cells().iter().all(|cell| !cell.is_revealed()));

        assert_eq!(board.reveal((0, 0)), Ok(RevealOutcome::Won));
    }

    #[test]
    fn won_score_is_claimed_once_per_game() {
        let mut board = Board::with_seed(Difficulty::Beginner.config(), 5).unwrap();
        assert_eq!(board.claim_score(), None);

        let mines: Vec<_> = all_coords(9)
            .filter(|&coords| board.cell_at(coords).unwrap().is_mine())
            .collect();
        for coords in mines {
            board.toggle_flag(coords).unwrap();
            board.tick();
        }

        assert_eq!(board.outcome(), Outcome::Won);
        assert_eq!(board.claim_score(), Some((Difficulty::Beginner, 9)));
        assert_eq!(board.claim_score(), None);

        board.reset();
        assert_eq!(board.claim_score(), None);
    }

    #[test]
    fn custom_board_has_no_score_to_claim() {
        let mut board = board(3, &[(1, 1)]);

        assert_eq!(board.toggle_flag((1, 1)), Ok(MarkOutcome::Won));
        assert_eq!(board.claim_score(), None);
    }

    #[test]
    fn timer_runs_between_first_intent_and_game_over() {
        let mut board = board(3, &[(0, 0)]);

        assert!(!board.tick());
        assert_eq!(board.elapsed_secs(), 0);

        board.toggle_flag((1, 1)).unwrap();
        assert!(board.tick());
        assert!(board.tick());
        assert_eq!(board.elapsed_secs(), 2);

        board.reveal((0, 0)).unwrap();
        assert!(!board.tick());
        assert_eq!(board.elapsed_secs(), 2);

        board.reset();
        assert!(!board.is_started());
        assert_eq!(board.elapsed_secs(), 0);
        assert_eq!(board.outcome(), Outcome::InProgress);
    }

    #[test]
    fn out_of_bounds_intents_are_rejected() {
        let mut board = board(3, &[(0, 0)]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert!(!board.is_started());
        assert!(board.cell_at((3, 3)).is_none());
    }
}
