use log::debug;
use maze_grid::{Boundary, GridGraph};
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::generator::{Generator, GeneratorError, Highlight};

/// Kruskal's algorithm over a uniformly shuffled edge list.
///
/// Cells start out in singleton sets. Examining an edge whose endpoints
/// lie in different sets opens it and merges the two sets; an edge inside
/// one set is reported and left standing. Merging relabels every member of
/// the higher-numbered set, an O(cells) scan per merge. Fine at the grid
/// sizes this drives; swap in union-by-rank with path compression if that
/// scan ever shows up in a profile.
pub struct RandomizedKruskal {
    rng: Box<dyn RngCore>,
    edges: Option<Vec<Boundary>>,
    cursor: usize,
    set_of: Vec<usize>,
}

impl RandomizedKruskal {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        Self {
            rng,
            edges: None,
            cursor: 0,
            set_of: Vec::new(),
        }
    }
}

impl Generator for RandomizedKruskal {
    fn step(&mut self, graph: &mut GridGraph) -> Result<Option<Vec<Highlight>>, GeneratorError> {
        if self.edges.is_none() {
            graph.set_all_walls(true);
            let mut edges: Vec<Boundary> = graph.boundaries().collect();
            edges.shuffle(&mut self.rng);
            self.set_of = (0..graph.cell_count()).collect();
            self.edges = Some(edges);
        }
        let boundary = match self.edges.as_ref().and_then(|e| e.get(self.cursor)) {
            Some(&boundary) => boundary,
            None => return Ok(None),
        };
        self.cursor += 1;

        let (a, b) = boundary.cells();
        let set_a = *self
            .set_of
            .get(a.0)
            .ok_or_else(|| GeneratorError::Internal(format!("cell {} outside partition", a.0)))?;
        let set_b = *self
            .set_of
            .get(b.0)
            .ok_or_else(|| GeneratorError::Internal(format!("cell {} outside partition", b.0)))?;

        let mut touched = vec![Highlight::Boundary(boundary)];
        if set_a != set_b {
            graph.set_wall(boundary, false);
            // Merge into the numerically smaller set id.
            let keep = set_a.min(set_b);
            let gone = set_a.max(set_b);
            for slot in &mut self.set_of {
                if *slot == gone {
                    *slot = keep;
                }
            }
            debug!("opened {:?}, merged set {} into set {}", boundary, gone, keep);
            touched.push(Highlight::Cell(a));
            touched.push(Highlight::Cell(b));
        }
        Ok(Some(touched))
    }
}
