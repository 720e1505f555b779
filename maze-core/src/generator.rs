use maze_grid::{Boundary, CellId, GridError, GridGraph};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backtracker;
pub mod kruskal;
pub mod random_toggle;
pub mod wilson;

pub use backtracker::RecursiveBacktracker;
pub use kruskal::RandomizedKruskal;
pub use random_toggle::RandomToggle;
pub use wilson::Wilson;

/// One entity touched by a generation step.
///
/// Renderers match on this exhaustively to decide what to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Highlight {
    /// A cell the algorithm visited or revisited.
    Cell(CellId),
    /// A boundary the algorithm examined or mutated.
    Boundary(Boundary),
}

/// Errors that can occur while advancing a generator.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A grid topology operation failed.
    #[error("grid operation failed: {0}")]
    Grid(#[from] GridError),
    /// A state-machine invariant that no caller input can reach was
    /// violated.
    #[error("internal generator error: {0}")]
    Internal(String),
}

/// A maze generation algorithm driven one atomic step at a time.
///
/// Implementations are explicit state machines: all progress lives in the
/// instance, so the caller may interleave `step` calls with arbitrary other
/// work and resume exactly where the previous call suspended. An instance
/// is not re-entrant; `&mut self` keeps a second driver out at compile
/// time.
pub trait Generator {
    /// Advances the algorithm by one atomic step.
    ///
    /// # Arguments
    ///
    /// * `graph` - The grid whose walls the algorithm shapes. The same
    ///   graph must be passed on every call of one run; the first call
    ///   bulk-initializes its wall state.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(touched))` - The entities this step touched, in the
    ///   order they were touched.
    /// * `Ok(None)` - The algorithm is exhausted; every further call
    ///   returns `Ok(None)` as well.
    /// * `Err(GeneratorError)` - A grid operation or internal invariant
    ///   failed.
    fn step(&mut self, graph: &mut GridGraph) -> Result<Option<Vec<Highlight>>, GeneratorError>;
}

/// Names the available generation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeneratorKind {
    /// Flips a coin per boundary; illustrative noise, not a spanning maze.
    #[default]
    RandomToggle,
    /// Randomized depth-first search with an explicit path stack.
    RecursiveBacktracker,
    /// Kruskal's algorithm over a shuffled edge list and a disjoint-set
    /// partition of the cells.
    RandomizedKruskal,
    /// Wilson's loop-erased random walk; samples spanning trees uniformly.
    Wilson,
}

impl GeneratorKind {
    /// Constructs a fresh instance of the named algorithm around `rng`.
    pub fn build(self, rng: Box<dyn RngCore>) -> Box<dyn Generator> {
        match self {
            Self::RandomToggle => Box::new(RandomToggle::new(rng)),
            Self::RecursiveBacktracker => Box::new(RecursiveBacktracker::new(rng)),
            Self::RandomizedKruskal => Box::new(RandomizedKruskal::new(rng)),
            Self::Wilson => Box::new(Wilson::new(rng)),
        }
    }
}
