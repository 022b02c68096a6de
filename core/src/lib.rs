use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use observer::*;
pub use position::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod error;
mod game;
mod observer;
mod position;
mod types;
mod view;

/// Dimensions and mine count a game is created from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Size,
    pub mines: CellCount,
}

impl GameConfig {
    pub const DEFAULT_WIDTH: Coord = 30;
    pub const MIN_WIDTH: Coord = 1;
    pub const MAX_WIDTH: Coord = 256;

    pub const DEFAULT_HEIGHT: Coord = 16;
    pub const MIN_HEIGHT: Coord = 1;
    pub const MAX_HEIGHT: Coord = 256;

    pub const DEFAULT_MINES: CellCount = 99;
    pub const MIN_MINES: CellCount = 0;
    pub const MAX_MINES: CellCount = mult(Self::MAX_WIDTH, Self::MAX_HEIGHT);

    pub const fn new_unchecked(size: Size, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked((width, height), mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&width)
            || !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&height)
        {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            (Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
            Self::DEFAULT_MINES,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
