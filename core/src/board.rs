use hashbrown::HashSet;
use ndarray::Array2;
use rand::Rng;
use std::collections::VecDeque;

use crate::*;

/// Dense grid of cells plus the mine budget, stored line-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    size: Size,
    mines: CellCount,
    mined: bool,
    mines_placed: CellCount,
    safe_revealed: CellCount,
    mines_revealed: CellCount,
    flagged: CellCount,
}

impl Board {
    /// Creates a board where every cell is hidden and unmined, mines are placed later.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let size = (width, height);
        if mines > mult(width, height) {
            return Err(GameError::TooManyMines);
        }

        let cells = Array2::from_shape_fn(size.to_nd_index(), |(line, column)| {
            Cell::new(Position::new(line as Coord, column as Coord))
        });

        Ok(Self {
            cells,
            size,
            mines,
            mined: false,
            mines_placed: 0,
            safe_revealed: 0,
            mines_revealed: 0,
            flagged: 0,
        })
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn dimensions(&self) -> Size {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Configured number of mines.
    pub fn mines(&self) -> CellCount {
        self.mines
    }

    /// Number of cells actually mined, zero until mines are placed.
    pub fn mines_placed(&self) -> CellCount {
        self.mines_placed
    }

    /// Whether mines have been placed on this board.
    pub fn is_mined(&self) -> bool {
        self.mined
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged
    }

    pub fn revealed_count(&self) -> CellCount {
        self.safe_revealed + self.mines_revealed
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn cell_grid(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if position.is_within(self.size) {
            Ok(position)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn cell_at(&self, position: Position) -> Result<&Cell> {
        let position = self.validate_position(position)?;
        Ok(&self.cells[position.to_nd_index()])
    }

    /// The clicked cell and its neighbors on this board, the usual set to keep free of mines on a
    /// first move.
    pub fn opening_exclusion(&self, position: Position) -> Result<HashSet<Position>> {
        let position = self.validate_position(position)?;
        let size = self.size;
        Ok(position
            .iter_neighbors()
            .filter(|pos| pos.is_within(size))
            .chain([position])
            .collect())
    }

    pub fn place_mines(&mut self, excluded: impl IntoIterator<Item = Position>) -> Result<()> {
        self.place_mines_with(excluded, &mut rand::rng())
    }

    /// Mines the configured number of random cells outside `excluded`, can only happen once.
    pub fn place_mines_with<R: Rng + ?Sized>(
        &mut self,
        excluded: impl IntoIterator<Item = Position>,
        rng: &mut R,
    ) -> Result<()> {
        self.check_can_place()?;

        let excluded: HashSet<Position> = excluded.into_iter().collect();
        let (width, height) = self.size;
        let positions = Position::random_positions(self.mines, height, width, &excluded, rng)?;

        self.mine_positions(positions);
        Ok(())
    }

    /// Mines exactly the given cells, their count has to match the configured number of mines.
    pub fn place_mines_at(&mut self, positions: impl IntoIterator<Item = Position>) -> Result<()> {
        self.check_can_place()?;

        let mut unique = HashSet::new();
        for position in positions {
            let position = self.validate_position(position)?;
            if !unique.insert(position) {
                return Err(GameError::MineCountMismatch);
            }
        }
        if CellCount::try_from(unique.len()) != Ok(self.mines) {
            return Err(GameError::MineCountMismatch);
        }

        self.mine_positions(unique);
        Ok(())
    }

    /// Mines go down once, before anything is revealed.
    fn check_can_place(&self) -> Result<()> {
        if self.mined {
            log::warn!("Mines were already placed, refusing to place them again");
            Err(GameError::MinesAlreadyPlaced)
        } else if self.revealed_count() > 0 {
            log::warn!("Cells were already revealed, refusing to place mines");
            Err(GameError::CellsAlreadyRevealed)
        } else {
            Ok(())
        }
    }

    fn mine_positions(&mut self, positions: impl IntoIterator<Item = Position>) {
        let size = self.size;
        for position in positions {
            self.cells[position.to_nd_index()].mine();
            for neighbor in position.iter_neighbors().filter(|pos| pos.is_within(size)) {
                self.cells[neighbor.to_nd_index()].increment_mines_around();
            }
        }
        self.mined = true;
        self.recount();

        log::debug!(
            "Placed {} mines on a {}x{} board",
            self.mines_placed,
            size.0,
            size.1
        );
    }

    /// Rebuilds the aggregate counters from the cells.
    fn recount(&mut self) {
        let (mut placed, mut safe_revealed, mut mines_revealed, mut flagged) = (0, 0, 0, 0);
        for cell in &self.cells {
            placed += CellCount::from(cell.is_mined());
            flagged += CellCount::from(cell.is_flagged());
            if cell.is_revealed() {
                if cell.is_mined() {
                    mines_revealed += 1;
                } else {
                    safe_revealed += 1;
                }
            }
        }
        self.mines_placed = placed;
        self.safe_revealed = safe_revealed;
        self.mines_revealed = mines_revealed;
        self.flagged = flagged;
    }

    /// Reveals a cell, cascading through every connected cell without mines around.
    pub fn reveal_cell_at(&mut self, position: Position) -> Result<bool> {
        let position = self.validate_position(position)?;

        if !self.reveal_single_cell(position) {
            return Ok(false);
        }

        let cell = self.cells[position.to_nd_index()];
        if !cell.is_mined() && cell.mines_around() == 0 {
            self.flood_fill(position);
        }
        Ok(true)
    }

    fn reveal_single_cell(&mut self, position: Position) -> bool {
        let cell = &mut self.cells[position.to_nd_index()];
        if !cell.reveal() {
            return false;
        }
        if cell.is_mined() {
            self.mines_revealed += 1;
        } else {
            self.safe_revealed += 1;
        }
        true
    }

    fn flood_fill(&mut self, origin: Position) {
        let size = self.size;
        let mut queued: HashSet<Position> = HashSet::from([origin]);
        let mut to_visit = VecDeque::from([origin]);
        let mut opened: CellCount = 0;

        while let Some(visit) = to_visit.pop_front() {
            for neighbor in visit.iter_neighbors() {
                if !neighbor.is_within(size) || !queued.insert(neighbor) {
                    continue;
                }

                // flagged cells stop the cascade, mined ones can't be reached from a zero anyway
                let cell = self.cells[neighbor.to_nd_index()];
                if cell.is_mined() || !cell.is_hidden() {
                    continue;
                }

                self.reveal_single_cell(neighbor);
                opened += 1;

                if cell.mines_around() == 0 {
                    to_visit.push_back(neighbor);
                }
            }
        }

        log::trace!("Flood fill from {} opened {} cells", origin, opened);
    }

    pub fn flag_cell_at(&mut self, position: Position) -> Result<bool> {
        let position = self.validate_position(position)?;
        let cell = &mut self.cells[position.to_nd_index()];

        if !cell.flag() {
            return Ok(false);
        }
        if cell.is_flagged() {
            self.flagged += 1;
        } else {
            self.flagged -= 1;
        }
        Ok(true)
    }

    /// Whether any mined cell was revealed.
    pub fn has_mine_revealed(&self) -> bool {
        self.mines_revealed > 0
    }

    /// Whether every cell but the configured mines is revealed.
    pub fn is_completed(&self) -> bool {
        self.safe_revealed == self.total_cells() - self.mines
    }
}
