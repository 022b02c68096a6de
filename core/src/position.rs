use core::fmt;
use hashbrown::HashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Line and column of a cell, line-major like the board storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    line: Coord,
    column: Coord,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0, 0);

    pub const fn new(line: Coord, column: Coord) -> Self {
        Self { line, column }
    }

    pub const fn line(self) -> Coord {
        self.line
    }

    pub const fn column(self) -> Coord {
        self.column
    }

    /// Adjacent positions, clockwise from the top-left one.
    ///
    /// Only the coordinate axes clip the result, so a position on the edge of a
    /// board still yields neighbors past that edge; filter them with
    /// [`Position::in_bounds`].
    pub fn neighbors(self) -> SmallVec<[Position; 8]> {
        NeighborIter::new(self).collect()
    }

    pub fn iter_neighbors(self) -> NeighborIter {
        NeighborIter::new(self)
    }

    /// Whether this position lies inside a `width` x `height` board.
    pub fn in_bounds(self, width: Coord, height: Coord) -> Result<bool> {
        if width < 1 || height < 1 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(self.is_within((width, height)))
    }

    pub(crate) const fn is_within(self, (width, height): Size) -> bool {
        self.line < height && self.column < width
    }

    /// Draws `count` distinct positions from `[0, max_line) x [0, max_column)`, skipping `excluded`.
    ///
    /// Runs a partial Fisher-Yates shuffle over the eligible positions, so the cost stays linear in
    /// the grid size even when nearly every eligible position gets picked.
    pub fn random_positions<R: Rng + ?Sized>(
        count: CellCount,
        max_line: Coord,
        max_column: Coord,
        excluded: &HashSet<Position>,
        rng: &mut R,
    ) -> Result<HashSet<Position>> {
        let mut eligible: Vec<Position> = (0..max_line)
            .flat_map(|line| (0..max_column).map(move |column| Position::new(line, column)))
            .filter(|pos| !excluded.contains(pos))
            .collect();

        let count = usize::try_from(count).map_err(|_| GameError::TooManyMines)?;
        if count > eligible.len() {
            return Err(GameError::TooManyMines);
        }

        let (chosen, _) = eligible.partial_shuffle(rng, count);
        Ok(chosen.iter().copied().collect())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((line, column): (Coord, Coord)) -> Self {
        Self::new(line, column)
    }
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.line.into(), self.column.into()]
    }
}

/// `(line, column)` offsets, clockwise starting at the top-left neighbor.
const DISPLACEMENTS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Applies `delta` to `pos`, returning a value only when both coordinates stay representable.
fn apply_delta(pos: Position, (dl, dc): (i16, i16)) -> Option<Position> {
    let line = pos.line.checked_add_signed(dl)?;
    let column = pos.column.checked_add_signed(dc)?;
    Some(Position::new(line, column))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position) -> Self {
        Self { center, index: 0 }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta) {
                return Some(next_item);
            }
        }
    }
}
