use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Most mines a cell can have around it.
pub const MAX_MINES_AROUND: u8 = 8;

/// What the player currently sees of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    visibility: Visibility,
    mines_around: u8,
    mined: bool,
    position: Position,
}

impl Cell {
    /// Hidden, unmined cell with no mines around.
    pub const fn new(position: Position) -> Self {
        Self {
            visibility: Visibility::Hidden,
            mines_around: 0,
            mined: false,
            position,
        }
    }

    pub fn from_parts(
        visibility: Visibility,
        mines_around: u8,
        mined: bool,
        position: Position,
    ) -> Result<Self> {
        if mines_around > MAX_MINES_AROUND {
            return Err(GameError::InvalidMinesAround);
        }
        Ok(Self {
            visibility,
            mines_around,
            mined,
            position,
        })
    }

    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub const fn mines_around(&self) -> u8 {
        self.mines_around
    }

    pub const fn is_mined(&self) -> bool {
        self.mined
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub fn neighbor_positions(&self) -> SmallVec<[Position; 8]> {
        self.position.neighbors()
    }

    /// Reveals a hidden cell. Flagged cells have to be unflagged first.
    pub fn reveal(&mut self) -> bool {
        if self.is_hidden() {
            self.visibility = Visibility::Revealed;
            true
        } else {
            false
        }
    }

    /// Toggles between hidden and flagged, revealed cells stay as they are.
    pub fn flag(&mut self) -> bool {
        use Visibility::*;

        self.visibility = match self.visibility {
            Hidden => Flagged,
            Flagged => Hidden,
            Revealed => return false,
        };
        true
    }

    pub fn mine(&mut self) {
        self.mined = true;
    }

    pub fn increment_mines_around(&mut self) {
        if self.mines_around < MAX_MINES_AROUND {
            self.mines_around += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(visibility: Visibility, mines_around: u8) -> Cell {
        Cell::from_parts(visibility, mines_around, false, Position::ORIGIN).unwrap()
    }

    #[test]
    fn from_parts_rejects_more_than_eight_mines_around() {
        assert_eq!(
            Cell::from_parts(Visibility::Revealed, 9, true, Position::ORIGIN),
            Err(GameError::InvalidMinesAround)
        );
    }

    #[test]
    fn new_cell_is_hidden_and_safe() {
        let cell = Cell::new(Position::new(3, 4));

        assert!(cell.is_hidden());
        assert!(!cell.is_mined());
        assert_eq!(cell.mines_around(), 0);
        assert_eq!(cell.position(), Position::new(3, 4));
    }

    #[test]
    fn mine_is_idempotent() {
        let mut cell = Cell::new(Position::ORIGIN);
        cell.mine();
        cell.mine();
        assert!(cell.is_mined());
    }

    #[test]
    fn hidden_cell_can_be_revealed_once() {
        let mut cell = cell(Visibility::Hidden, 0);

        assert!(cell.reveal());
        assert!(cell.is_revealed());
        assert!(!cell.reveal());
    }

    #[test]
    fn flagged_cell_can_not_be_revealed() {
        let mut cell = cell(Visibility::Flagged, 0);

        assert!(!cell.reveal());
        assert!(cell.is_flagged());
    }

    #[test]
    fn flag_toggles_hidden_and_flagged() {
        let mut cell = cell(Visibility::Hidden, 0);

        assert!(cell.flag());
        assert_eq!(cell.visibility(), Visibility::Flagged);
        assert!(cell.flag());
        assert_eq!(cell.visibility(), Visibility::Hidden);
    }

    #[test]
    fn revealed_cell_can_not_be_flagged() {
        let mut cell = cell(Visibility::Revealed, 2);

        assert!(!cell.flag());
        assert!(cell.is_revealed());
    }

    #[test]
    fn increment_mines_around_saturates() {
        let mut cell = cell(Visibility::Hidden, 7);

        cell.increment_mines_around();
        cell.increment_mines_around();

        assert_eq!(cell.mines_around(), MAX_MINES_AROUND);
    }

    #[test]
    fn neighbor_positions_follow_position() {
        let cell = Cell::new(Position::ORIGIN);
        assert_eq!(cell.neighbor_positions(), Position::ORIGIN.neighbors());
    }
}
