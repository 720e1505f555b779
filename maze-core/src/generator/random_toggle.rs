use maze_grid::{Boundary, GridGraph};
use rand::{Rng, RngCore};

use crate::generator::{Generator, GeneratorError, Highlight};

/// Chance that any given boundary becomes a wall.
pub const WALL_PROBABILITY: f64 = 0.5;

/// Flips a coin for every boundary in enumeration order.
///
/// Produces noise rather than a maze. Useful for exercising renderers and
/// the engine without caring about spanning-tree structure.
pub struct RandomToggle {
    rng: Box<dyn RngCore>,
    edges: Option<Vec<Boundary>>,
    cursor: usize,
}

impl RandomToggle {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        Self {
            rng,
            edges: None,
            cursor: 0,
        }
    }
}

impl Generator for RandomToggle {
    fn step(&mut self, graph: &mut GridGraph) -> Result<Option<Vec<Highlight>>, GeneratorError> {
        if self.edges.is_none() {
            graph.set_all_walls(false);
            self.edges = Some(graph.boundaries().collect());
        }
        let boundary = match self.edges.as_ref().and_then(|e| e.get(self.cursor)) {
            Some(&boundary) => boundary,
            None => return Ok(None),
        };
        self.cursor += 1;
        graph.set_wall(boundary, self.rng.gen_bool(WALL_PROBABILITY));
        Ok(Some(vec![Highlight::Boundary(boundary)]))
    }
}
