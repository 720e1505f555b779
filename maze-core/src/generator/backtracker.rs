use bitvec::prelude::*;
use log::debug;
use maze_grid::{CellId, GridGraph};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::generator::{Generator, GeneratorError, Highlight};

/// Randomized depth-first search with an explicit path stack.
///
/// The stack always holds the path from the start cell to the active cell.
/// Each visit pops and reports the active cell; if it still has unvisited
/// neighbors it is pushed back together with a randomly chosen one and the
/// wall between them comes down. A cell with none stays popped, which
/// backtracks the walk by one cell.
pub struct RecursiveBacktracker {
    rng: Box<dyn RngCore>,
    stack: Vec<CellId>,
    visited: BitVec,
    phase: Phase,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Visit,
    Extend { active: CellId },
}

impl RecursiveBacktracker {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        Self {
            rng,
            stack: Vec::new(),
            visited: BitVec::new(),
            phase: Phase::Start,
        }
    }
}

impl Generator for RecursiveBacktracker {
    fn step(&mut self, graph: &mut GridGraph) -> Result<Option<Vec<Highlight>>, GeneratorError> {
        loop {
            match self.phase {
                Phase::Start => {
                    graph.set_all_walls(true);
                    let start = CellId(self.rng.gen_range(0..graph.cell_count()));
                    debug!("depth-first search starting at cell {}", start.0);
                    self.visited = bitvec![0; graph.cell_count()];
                    self.visited.set(start.0, true);
                    self.stack.push(start);
                    self.phase = Phase::Visit;
                }
                Phase::Visit => {
                    let Some(active) = self.stack.pop() else {
                        return Ok(None);
                    };
                    self.phase = Phase::Extend { active };
                    return Ok(Some(vec![Highlight::Cell(active)]));
                }
                Phase::Extend { active } => {
                    self.phase = Phase::Visit;
                    let unvisited: Vec<CellId> = graph
                        .neighbor_ids(active)
                        .into_iter()
                        .filter(|n| !self.visited[n.0])
                        .collect();
                    // Dead end: the pop stands and the walk backtracks.
                    let Some(&next) = unvisited.choose(&mut self.rng) else {
                        continue;
                    };
                    self.stack.push(active);
                    self.visited.set(next.0, true);
                    self.stack.push(next);
                    let passage = graph.boundary_between(active, next)?;
                    graph.set_wall(passage, false);
                    return Ok(Some(vec![Highlight::Boundary(passage)]));
                }
            }
        }
    }
}
