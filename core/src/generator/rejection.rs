use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Places mines by drawing random cells and retrying when a draw lands on a cell that is already
/// mined. Every cell ends up with the same chance of holding a mine, and retries stay rare for the
/// mine densities of the standard difficulties.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionSampler {
    seed: u64,
}

impl RejectionSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RejectionSampler {
    fn generate(self, config: GameConfig) -> MineLayout {
        let mut layout = MineLayout::empty(config.side);

        // cannot place more mines than cells, and at least one cell stays safe
        let wanted = config.mines.min(config.total_cells().saturating_sub(1));
        if wanted != config.mines {
            log::warn!(
                "Requested {} mines but only {} fit, placing fewer",
                config.mines,
                wanted
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut draws: u32 = 0;
        while layout.mine_count() < wanted {
            let row = rng.random_range(0..config.side);
            let col = rng.random_range(0..config.side);
            layout.place_mine((row, col));
            draws += 1;
        }

        log::debug!(
            "Placed {} mines on a {}x{} board with {} draws (seed {})",
            layout.mine_count(),
            config.side,
            config.side,
            draws,
            self.seed
        );
        layout
    }
}
