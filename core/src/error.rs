use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board side must be at least 1")]
    InvalidSize,
    #[error("Adjacency count is already set to a different value")]
    InvalidState,
}

pub type Result<T> = core::result::Result<T, GameError>;
