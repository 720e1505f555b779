use bitvec::prelude::*;
use log::debug;
use maze_grid::{Boundary, CellId, GridGraph};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::generator::{Generator, GeneratorError, Highlight};

/// Wilson's algorithm: loop-erased random walks into a growing tree.
///
/// One random cell seeds the tree. Every still-unconnected cell then walks
/// randomly, recording the exit edge chosen at each cell it passes through
/// and overwriting the record on a revisit, so any loop the walk closed is
/// erased the moment it closes. The walk stops on reaching the tree, and a
/// replay from the walk's start follows the surviving records, connecting
/// each cell and opening each recorded edge. Exit records stranded on
/// erased loops are never replayed. The tree this grows is a uniform
/// sample from all spanning trees of the grid.
pub struct Wilson {
    rng: Box<dyn RngCore>,
    connected: BitVec,
    exit_of: Vec<Option<Boundary>>,
    scan: usize,
    phase: Phase,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Seed,
    NextWalk,
    Walk { start: CellId, at: CellId },
    Carve { at: CellId },
}

impl Wilson {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        Self {
            rng,
            connected: BitVec::new(),
            exit_of: Vec::new(),
            scan: 0,
            phase: Phase::Seed,
        }
    }
}

impl Generator for Wilson {
    fn step(&mut self, graph: &mut GridGraph) -> Result<Option<Vec<Highlight>>, GeneratorError> {
        loop {
            match self.phase {
                Phase::Seed => {
                    graph.set_all_walls(true);
                    let count = graph.cell_count();
                    self.connected = bitvec![0; count];
                    self.exit_of = vec![None; count];
                    let seed = CellId(self.rng.gen_range(0..count));
                    self.connected.set(seed.0, true);
                    debug!("tree seeded at cell {}", seed.0);
                    self.phase = Phase::NextWalk;
                    return Ok(Some(vec![Highlight::Cell(seed)]));
                }
                Phase::NextWalk => {
                    while self.scan < self.connected.len() && self.connected[self.scan] {
                        self.scan += 1;
                    }
                    if self.scan >= self.connected.len() {
                        return Ok(None);
                    }
                    let start = CellId(self.scan);
                    self.phase = Phase::Walk { start, at: start };
                }
                Phase::Walk { start, at } => {
                    let neighbors = graph.neighbor_ids(at);
                    let next = *neighbors.choose(&mut self.rng).ok_or_else(|| {
                        GeneratorError::Internal(format!("cell {} has nowhere to walk", at.0))
                    })?;
                    let exit = graph.boundary_between(at, next)?;
                    // A revisit overwrites the stale exit, erasing the loop
                    // the walk just closed.
                    self.exit_of[at.0] = Some(exit);
                    self.phase = if self.connected[next.0] {
                        Phase::Carve { at: start }
                    } else {
                        Phase::Walk { start, at: next }
                    };
                    return Ok(Some(vec![Highlight::Cell(at)]));
                }
                Phase::Carve { at } => {
                    if self.connected[at.0] {
                        // Replay reached the tree; look for the next walk.
                        self.phase = Phase::NextWalk;
                        continue;
                    }
                    self.connected.set(at.0, true);
                    let exit = self.exit_of[at.0].ok_or_else(|| {
                        GeneratorError::Internal(format!("no exit recorded for cell {}", at.0))
                    })?;
                    graph.set_wall(exit, false);
                    self.phase = Phase::Carve {
                        at: exit.other(at),
                    };
                    return Ok(Some(vec![Highlight::Cell(at), Highlight::Boundary(exit)]));
                }
            }
        }
    }
}
