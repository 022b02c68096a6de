/// Single coordinate axis used for board width, height, lines and columns.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts, fits a 256x256 board.
pub type CellCount = u32;

/// Board dimensions `(width, height)`.
pub type Size = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Size {
    type Output = [usize; 2];

    /// Shape of the backing array, which is stored line-major: `[height, width]`.
    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
