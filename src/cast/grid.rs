//! Tile grid the rays travel through
//!
//! Cells are addressed by integer `(col, row)`, with `row` growing downward in
//! the same direction as world `y`. Anything outside the grid reads as a wall,
//! which is what lets every trace terminate.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::consts::ITERATION_CAP_FACTOR;

/// Tile value of a wall, as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u8);

impl MaterialId {
    /// Plain wall, also reported for every out-of-bounds lookup
    pub const BOUNDARY: Self = Self(1);
    /// Red brick
    pub const BRICK: Self = Self(2);
    /// Tile value level files use underneath mirrors
    pub const MIRROR: Self = Self(3);
}

/// Which grid axis a mirror lies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorOrientation {
    /// Surface runs north-south; flips the X component of a ray
    Vertical,
    /// Surface runs east-west; flips the Y component of a ray
    Horizontal,
}

/// One grid unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall(MaterialId),
    Mirror(MirrorOrientation),
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Reasons a grid can't be built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("a {width}x{height} grid needs {expected} cells, got {actual}")]
    CellCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell size must be positive and finite, got {0}")]
    CellSize(f64),
}

/// Immutable tile grid with a fixed cell side length in world units
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGrid {
    width: u32,
    height: u32,
    cell_size: f64,
    /// Row-major, `width * height` long
    cells: Vec<Cell>,
}

impl LevelGrid {
    pub fn new(width: u32, height: u32, cells: Vec<Cell>, cell_size: f64) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::CellSize(cell_size));
        }

        Ok(Self {
            width,
            height,
            cell_size,
            cells,
        })
    }

    /// Build a grid from rows of cells (`rows[row][col]`)
    pub fn from_rows(rows: &[Vec<Cell>], cell_size: f64) -> Result<Self, GridError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRow {
                row,
                expected: width,
                actual: r.len(),
            });
        }

        let cells = rows.iter().flatten().copied().collect();
        Self::new(width as u32, rows.len() as u32, cells, cell_size)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Side length of one cell, in world units
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell at `(col, row)`; out-of-range coordinates are an implicit wall
    #[inline]
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return Cell::Wall(MaterialId::BOUNDARY);
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    /// Cell coordinates containing a world-space point
    #[inline]
    pub fn world_to_cell(&self, point: DVec2) -> IVec2 {
        (point / self.cell_size).floor().as_ivec2()
    }

    /// Hard limit on grid steps for a single trace
    #[inline]
    pub fn iteration_cap(&self) -> u32 {
        self.width.max(self.height).saturating_mul(ITERATION_CAP_FACTOR)
    }

    /// Row-major iterator over `((col, row), cell)`
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (IVec2::new((i % width) as i32, (i / width) as i32), cell))
    }
}
