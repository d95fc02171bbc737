use ndarray::Array2;

/// Board side length, and either half of a position.
pub type Coord = u8;

/// Mine counts and cell totals. A full 255x255 board still fits.
pub type CellCount = u16;

/// `(row, col)`
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        let (row, col) = self;
        [usize::from(row), usize::from(col)]
    }
}

/// Number of cells on a square board with `side` cells per row.
pub const fn cells_on_side(side: Coord) -> CellCount {
    let side = side as CellCount;
    side * side
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors;
}

/// Boards are square, so only the row count is consulted.
impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors {
        let side = Coord::try_from(self.nrows()).unwrap_or(Coord::MAX);
        Neighbors::new(center, side)
    }
}

/// The cells touching `center` on a square board, in row-major order.
///
/// Walks the 3x3 window around `center`, clipped to the board, and skips `center` itself.
#[derive(Debug)]
pub struct Neighbors {
    center: Coord2,
    first_col: Coord,
    last: Coord2,
    next: Option<Coord2>,
}

impl Neighbors {
    fn new(center: Coord2, side: Coord) -> Self {
        let (row, col) = center;
        if row >= side || col >= side {
            return Self {
                center,
                first_col: 0,
                last: (0, 0),
                next: None,
            };
        }

        let edge = side - 1;
        Self {
            center,
            first_col: col.saturating_sub(1),
            last: (row.saturating_add(1).min(edge), col.saturating_add(1).min(edge)),
            next: Some((row.saturating_sub(1), col.saturating_sub(1))),
        }
    }

    fn advance(&self, (row, col): Coord2) -> Option<Coord2> {
        let (last_row, last_col) = self.last;
        if col < last_col {
            Some((row, col + 1))
        } else if row < last_row {
            Some((row + 1, self.first_col))
        } else {
            None
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next?;
            self.next = self.advance(current);
            if current != self.center {
                return Some(current);
            }
        }
    }
}
