use bitvec::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::GridError;

/// Identifies a grid cell by its row-major index.
///
/// Cell `(x, y)` has id `x + y * width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellId(pub usize);

/// The shared wall location between two adjacent cells.
///
/// Always stored in canonical form with `first < second`, so the same
/// unordered cell pair compares and hashes identically no matter which
/// way it was requested. Values are handed out by [`GridGraph`] queries;
/// callers do not assemble them from raw ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Boundary {
    first: CellId,
    second: CellId,
}

impl Boundary {
    pub(crate) fn new(a: CellId, b: CellId) -> Self {
        if a.0 <= b.0 {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// The endpoint with the smaller id.
    pub fn first(&self) -> CellId {
        self.first
    }

    /// The endpoint with the larger id.
    pub fn second(&self) -> CellId {
        self.second
    }

    /// Both endpoints, smaller id first.
    pub fn cells(&self) -> (CellId, CellId) {
        (self.first, self.second)
    }

    /// The endpoint on the other side of `cell`.
    ///
    /// Walks across the boundary from a known endpoint, as when following
    /// a recorded passage.
    pub fn other(&self, cell: CellId) -> CellId {
        if cell == self.first {
            self.second
        } else {
            self.first
        }
    }
}

/// A rectangular 4-connected grid with one wall bit per adjacent cell pair.
///
/// Wall bits are packed two per cell: slot `2 * id` holds the boundary to
/// the southern neighbor and slot `2 * id + 1` the boundary to the eastern
/// one. Cells on the right or bottom border simply never have their unused
/// slot addressed, so the packing wastes at most `width + height` bits and
/// keeps the slot computation branch-free.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridGraph {
    pub width: usize,
    pub height: usize,
    walls: BitVec,
}

impl GridGraph {
    /// Creates a fully open grid (no walls anywhere).
    ///
    /// # Errors
    ///
    /// Returns `GridError::ZeroDimension` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension(width, height));
        }
        let walls = bitvec![0; width * height * 2];
        Ok(Self {
            width,
            height,
            walls,
        })
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Iterates every cell id in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.cell_count()).map(CellId)
    }

    /// Resolves `(x, y)` coordinates to a cell id.
    ///
    /// # Errors
    ///
    /// Returns `GridError::OutOfBounds` if either coordinate falls outside
    /// the grid.
    pub fn cell_at(&self, x: usize, y: usize) -> Result<CellId, GridError> {
        if x < self.width && y < self.height {
            Ok(CellId(y * self.width + x))
        } else {
            Err(GridError::OutOfBounds(x, y, self.width, self.height))
        }
    }

    /// Recovers the `(x, y)` coordinates of a cell id.
    ///
    /// # Errors
    ///
    /// Returns `GridError::BadCellId` if the id exceeds the cell count.
    pub fn coords_of(&self, cell: CellId) -> Result<(usize, usize), GridError> {
        if cell.0 < self.cell_count() {
            Ok((cell.0 % self.width, cell.0 / self.width))
        } else {
            Err(GridError::BadCellId(cell.0, self.cell_count()))
        }
    }

    /// Valid neighbors of `cell` in west, north, east, south order.
    ///
    /// Neighbors across the grid border are excluded; there is no
    /// wraparound. The order is fixed so that a seeded random pick over
    /// the result is reproducible. An out-of-range id has no neighbors.
    pub fn neighbor_ids(&self, cell: CellId) -> Vec<CellId> {
        let id = cell.0;
        if id >= self.cell_count() {
            return Vec::new();
        }
        let x = id % self.width;
        let y = id / self.width;
        let mut neighbors = Vec::with_capacity(4);
        if x > 0 {
            neighbors.push(CellId(id - 1));
        }
        if y > 0 {
            neighbors.push(CellId(id - self.width));
        }
        if x + 1 < self.width {
            neighbors.push(CellId(id + 1));
        }
        if y + 1 < self.height {
            neighbors.push(CellId(id + self.width));
        }
        neighbors
    }

    /// The canonical boundary between two adjacent cells.
    ///
    /// Argument order does not matter; `boundary_between(a, b)` and
    /// `boundary_between(b, a)` return the same value.
    ///
    /// # Errors
    ///
    /// Returns `GridError::BadCellId` if either id is out of range, or
    /// `GridError::NotAdjacent` if the cells do not share a side.
    pub fn boundary_between(&self, a: CellId, b: CellId) -> Result<Boundary, GridError> {
        let count = self.cell_count();
        if a.0 >= count {
            return Err(GridError::BadCellId(a.0, count));
        }
        if b.0 >= count {
            return Err(GridError::BadCellId(b.0, count));
        }
        let (s, l) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
        if !self.are_adjacent(s, l) {
            return Err(GridError::NotAdjacent(a.0, b.0));
        }
        Ok(Boundary::new(a, b))
    }

    /// Whether the boundary currently holds a wall.
    ///
    /// A boundary this graph does not know (one minted by a graph of other
    /// dimensions) reads as open.
    #[inline]
    pub fn is_wall(&self, boundary: Boundary) -> bool {
        self.wall_slot(boundary)
            .map_or(false, |slot| self.walls[slot])
    }

    /// Sets or clears the wall on a boundary.
    ///
    /// Boundaries this graph does not know are ignored.
    pub fn set_wall(&mut self, boundary: Boundary, wall: bool) {
        if let Some(slot) = self.wall_slot(boundary) {
            self.walls.set(slot, wall);
        }
    }

    /// Sets every boundary in the grid to the same wall state.
    ///
    /// Algorithms call this once before their first move, so no wall state
    /// ever leaks from one run into the next.
    pub fn set_all_walls(&mut self, wall: bool) {
        self.walls.fill(wall);
    }

    /// Iterates every physical boundary exactly once.
    ///
    /// Order is stable: for each cell id ascending, its eastern boundary
    /// (when the cell is not on the right border) and then its southern
    /// one (when not on the bottom row).
    pub fn boundaries(&self) -> impl Iterator<Item = Boundary> {
        let width = self.width;
        let count = self.cell_count();
        (0..count).flat_map(move |id| {
            let east =
                (id % width + 1 < width).then(|| Boundary::new(CellId(id), CellId(id + 1)));
            let south = (id + width < count)
                .then(|| Boundary::new(CellId(id), CellId(id + width)));
            east.into_iter().chain(south)
        })
    }

    // Two cells with ids s <= l share a side iff they sit in the same row
    // one column apart, or in the same column one row apart. On a grid one
    // cell wide those coincide; the vertical test wins there because every
    // cell is on the right border.
    fn are_adjacent(&self, s: usize, l: usize) -> bool {
        if l - s == self.width {
            return true;
        }
        l - s == 1 && s % self.width != self.width - 1
    }

    fn wall_slot(&self, boundary: Boundary) -> Option<usize> {
        let s = boundary.first.0;
        let l = boundary.second.0;
        if l >= self.cell_count() || !self.are_adjacent(s, l) {
            return None;
        }
        let horizontal = l - s == 1 && s % self.width != self.width - 1;
        Some(s * 2 + usize::from(horizontal))
    }
}
