use thiserror::Error;

pub mod graph;

pub use graph::{Boundary, CellId, GridGraph};

/// Errors produced by grid construction and topology queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid dimension was zero.
    #[error("grid dimensions must be nonzero (got {0}x{1})")]
    ZeroDimension(usize, usize),
    /// A boundary was requested between cells that do not share a side.
    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(usize, usize),
    /// Coordinates fell outside the grid.
    #[error("coordinates ({0}, {1}) are outside a {2}x{3} grid")]
    OutOfBounds(usize, usize, usize, usize),
    /// A cell id exceeded the cell count.
    #[error("cell id {0} is out of range for a grid of {1} cells")]
    BadCellId(usize, usize),
}
