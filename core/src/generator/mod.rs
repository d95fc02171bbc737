use crate::*;
pub use rejection::*;

mod rejection;

pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}
