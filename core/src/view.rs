use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a player may know about a cell.
///
/// The adjacency count and mine identity are only filled in for revealed cells, or for every cell
/// once the game has ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub visibility: Visibility,
    pub mines_around: Option<u8>,
    pub mined: Option<bool>,
}

impl CellView {
    pub fn from_cell(cell: &Cell, disclose: bool) -> Self {
        let known = disclose || cell.is_revealed();
        Self {
            visibility: cell.visibility(),
            mines_around: known.then(|| cell.mines_around()),
            mined: known.then(|| cell.is_mined()),
        }
    }
}

/// Snapshot of a game handed to observers, detached from the live board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Size,
    pub mines: CellCount,
    pub unflagged_mines: isize,
    pub state: GameState,
    pub cells: Array2<CellView>,
}

impl BoardView {
    pub fn from_game(game: &Game) -> Self {
        let disclose = game.has_ended();
        let board = game.board();

        Self {
            size: board.dimensions(),
            mines: board.mines(),
            unflagged_mines: game.unflagged_mines(),
            state: game.state(),
            cells: board.cell_grid().map(|cell| CellView::from_cell(cell, disclose)),
        }
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn cell_at(&self, position: Position) -> Option<&CellView> {
        self.cells.get(position.to_nd_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(width: Coord, height: Coord, mines: &[(Coord, Coord)]) -> Game {
        let mut board = Board::new(width, height, mines.len() as CellCount).unwrap();
        board
            .place_mines_at(mines.iter().copied().map(Position::from))
            .unwrap();
        Game::from_board(board)
    }

    #[test]
    fn hidden_cells_do_not_leak_mines() {
        let mut game = game(3, 3, &[(0, 0), (2, 2)]);
        game.reveal_cell_at(Position::new(1, 1)).unwrap();

        let view = BoardView::from_game(&game);

        assert_eq!(
            view.cell_at(Position::ORIGIN),
            Some(&CellView {
                visibility: Visibility::Hidden,
                mines_around: None,
                mined: None,
            })
        );
        assert_eq!(
            view.cell_at(Position::new(1, 1)),
            Some(&CellView {
                visibility: Visibility::Revealed,
                mines_around: Some(2),
                mined: Some(false),
            })
        );
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("true"));
    }

    #[test]
    fn ended_game_discloses_every_cell() {
        let mut game = game(3, 3, &[(0, 0), (2, 2)]);
        game.reveal_cell_at(Position::ORIGIN).unwrap();

        let view = BoardView::from_game(&game);

        assert_eq!(view.state, GameState::Lost);
        assert_eq!(view.cell_at(Position::new(2, 2)).unwrap().mined, Some(true));
        assert_eq!(view.cell_at(Position::new(0, 1)).unwrap().mines_around, Some(1));
    }

    #[test]
    fn view_is_detached_from_game() {
        let mut game = game(3, 3, &[(2, 2)]);
        let before = BoardView::from_game(&game);

        game.flag_cell_at(Position::ORIGIN).unwrap();

        assert_eq!(before.cell_at(Position::ORIGIN).unwrap().visibility, Visibility::Hidden);
        assert_eq!(before.unflagged_mines, 1);
        assert_eq!(game.view().unflagged_mines, 0);
    }

    #[test]
    fn cell_at_outside_view_is_none() {
        let view = game(2, 3, &[]).view();

        assert_eq!((view.width(), view.height()), (2, 3));
        assert!(view.cell_at(Position::new(2, 1)).is_some());
        assert!(view.cell_at(Position::new(1, 2)).is_none());
    }
}
