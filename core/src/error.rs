use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions")]
    InvalidDimensions,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Position is outside the board")]
    InvalidPosition,
    #[error("Mines around a cell must be between 0 and 8")]
    InvalidMinesAround,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Mines can not be placed once cells are revealed")]
    CellsAlreadyRevealed,
    #[error("Mine positions do not match the mine count of the board")]
    MineCountMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;
