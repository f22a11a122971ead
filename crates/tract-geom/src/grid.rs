//! Square zone grid for building synthetic datasets.
//!
//! ```text
//!  y
//!  ^  ┌────┬────┬────┐
//!  │  │ 3  │ 4  │ 5  │   cells are numbered row-major from the origin;
//!  │  ├────┼────┼────┤   each one is a half-open square
//!  │  │ 0  │ 1  │ 2  │   [x0, x0 + size) x [y0, y0 + size)
//!  0  └────┴────┴────┘──> x
//! ```

use crate::{Point, Polygon};

/// One square of a [`ZoneGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row-major position, `row * columns + column`.
    pub index: usize,
    pub column: u32,
    pub row: u32,
}

/// A `columns x rows` grid of square cells with its lower-left corner at the
/// origin.
///
/// Every cell becomes one zone polygon. The cells tile the grid's extent
/// without overlap, so [`ZoneGrid::locate`] gives the zone any interior point
/// must be joined into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneGrid {
    columns: u32,
    rows: u32,
    cell_size: f64,
}

impl ZoneGrid {
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f64) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Side length of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Upper-right corner of the grid.
    #[must_use]
    pub fn extent(&self) -> Point {
        Point::new(
            f64::from(self.columns) * self.cell_size,
            f64::from(self.rows) * self.cell_size,
        )
    }

    /// Cell at a row-major index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }
        let columns = self.columns as usize;
        Some(Cell {
            index,
            column: (index % columns) as u32,
            row: (index / columns) as u32,
        })
    }

    /// All cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).filter_map(|index| self.cell(index))
    }

    /// Square polygon covering a cell.
    #[must_use]
    pub fn polygon(&self, cell: Cell) -> Polygon {
        let min = self.corner(cell);
        let max = Point::new(min.x + self.cell_size, min.y + self.cell_size);
        Polygon::rect(min, max)
    }

    /// Center point of a cell.
    #[must_use]
    pub fn center(&self, cell: Cell) -> Point {
        let min = self.corner(cell);
        let half = self.cell_size / 2.0;
        Point::new(min.x + half, min.y + half)
    }

    /// Cell whose half-open square holds `point`, if any.
    #[must_use]
    pub fn locate(&self, point: Point) -> Option<Cell> {
        let column = (point.x / self.cell_size).floor();
        let row = (point.y / self.cell_size).floor();
        let in_range = |v: f64, limit: u32| v >= 0.0 && v < f64::from(limit);

        if !in_range(column, self.columns) || !in_range(row, self.rows) {
            return None;
        }
        self.cell(row as usize * self.columns as usize + column as usize)
    }

    fn corner(&self, cell: Cell) -> Point {
        Point::new(
            f64::from(cell.column) * self.cell_size,
            f64::from(cell.row) * self.cell_size,
        )
    }
}
