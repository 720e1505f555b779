use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use maze_core::{Generator, GeneratorKind, Highlight};
use maze_grid::{Boundary, CellId, GridGraph};

// --- Test Setup Helpers ---

fn seeded(kind: GeneratorKind, seed: u64) -> Box<dyn Generator> {
    kind.build(Box::new(StdRng::seed_from_u64(seed)))
}

fn run_to_end(generator: &mut dyn Generator, graph: &mut GridGraph) -> Vec<Vec<Highlight>> {
    let mut reports = Vec::new();
    while let Some(touched) = generator.step(graph).unwrap() {
        reports.push(touched);
    }
    reports
}

fn wall_snapshot(graph: &GridGraph) -> Vec<bool> {
    graph.boundaries().map(|e| graph.is_wall(e)).collect()
}

fn open_edges(graph: &GridGraph) -> Vec<Boundary> {
    graph.boundaries().filter(|&e| !graph.is_wall(e)).collect()
}

fn is_fully_connected(graph: &GridGraph) -> bool {
    let count = graph.cell_count();
    let mut seen = vec![false; count];
    seen[0] = true;
    let mut reached = 1;
    let mut queue = VecDeque::from([CellId(0)]);
    while let Some(cell) = queue.pop_front() {
        for neighbor in graph.neighbor_ids(cell) {
            let passage = graph.boundary_between(cell, neighbor).unwrap();
            if !graph.is_wall(passage) && !seen[neighbor.0] {
                seen[neighbor.0] = true;
                reached += 1;
                queue.push_back(neighbor);
            }
        }
    }
    reached == count
}

// A spanning tree over n cells is n - 1 open edges plus full connectivity.
fn is_spanning_tree(graph: &GridGraph) -> bool {
    open_edges(graph).len() == graph.cell_count() - 1 && is_fully_connected(graph)
}

// --- RandomToggle ---

#[test]
fn test_toggle_reports_every_boundary_exactly_once() {
    for (w, h) in [(1, 1), (1, 4), (4, 1), (3, 3), (5, 4)] {
        let mut graph = GridGraph::new(w, h).unwrap();
        let mut generator = seeded(GeneratorKind::RandomToggle, 11);
        let reports = run_to_end(generator.as_mut(), &mut graph);
        let expected: Vec<_> = graph.boundaries().collect();
        let reported: Vec<Boundary> = reports
            .iter()
            .map(|report| match report.as_slice() {
                [Highlight::Boundary(b)] => *b,
                other => panic!("unexpected report {other:?}"),
            })
            .collect();
        assert_eq!(reported, expected, "size {w}x{h}");
        // Exhaustion is stable.
        assert!(generator.step(&mut graph).unwrap().is_none());
    }
}

#[test]
fn test_toggle_with_scripted_rng_walls_everything() {
    // StepRng always produces zero, and a zero draw lands below the 0.5
    // threshold, so every boundary becomes a wall.
    let mut graph = GridGraph::new(3, 3).unwrap();
    let mut generator = GeneratorKind::RandomToggle.build(Box::new(StepRng::new(0, 0)));
    run_to_end(generator.as_mut(), &mut graph);
    assert!(graph.boundaries().all(|e| graph.is_wall(e)));
}

// --- RecursiveBacktracker ---

#[test]
fn test_backtracker_serpentine_with_scripted_rng() {
    // StepRng always picks the first option: start at cell 0, always take
    // the first unvisited neighbor. On a 3x3 grid that walks
    // 0-1-2-5-4-3-6-7-8 and then backtracks the whole path.
    let mut graph = GridGraph::new(3, 3).unwrap();
    let mut generator = GeneratorKind::RecursiveBacktracker.build(Box::new(StepRng::new(0, 0)));
    let reports = run_to_end(generator.as_mut(), &mut graph);

    // 9 first visits, 8 carves, 8 backtrack visits.
    assert_eq!(reports.len(), 25);
    assert_eq!(reports[0], vec![Highlight::Cell(CellId(0))]);
    assert_eq!(reports[24], vec![Highlight::Cell(CellId(0))]);

    let opened: Vec<(usize, usize)> = open_edges(&graph)
        .iter()
        .map(|e| (e.first().0, e.second().0))
        .collect();
    assert_eq!(
        opened,
        vec![
            (0, 1),
            (1, 2),
            (2, 5),
            (3, 4),
            (3, 6),
            (4, 5),
            (6, 7),
            (7, 8)
        ]
    );
    assert!(is_spanning_tree(&graph));
}

#[test]
fn test_backtracker_alternates_visits_and_carves() {
    let mut graph = GridGraph::new(4, 4).unwrap();
    let mut generator = seeded(GeneratorKind::RecursiveBacktracker, 13);
    let reports = run_to_end(generator.as_mut(), &mut graph);
    for report in &reports {
        match report.as_slice() {
            [Highlight::Cell(_)] => {}
            [Highlight::Boundary(passage)] => assert!(!graph.is_wall(*passage)),
            other => panic!("unexpected report shape {other:?}"),
        }
    }
    let carves = reports
        .iter()
        .filter(|r| matches!(r.as_slice(), [Highlight::Boundary(_)]))
        .count();
    assert_eq!(carves, graph.cell_count() - 1);
}

// --- RandomizedKruskal ---

#[test]
fn test_kruskal_examines_every_boundary_once() {
    let mut graph = GridGraph::new(4, 3).unwrap();
    let mut generator = seeded(GeneratorKind::RandomizedKruskal, 21);
    let reports = run_to_end(generator.as_mut(), &mut graph);
    assert_eq!(reports.len(), graph.boundaries().count());

    let mut examined = Vec::new();
    for report in &reports {
        match report.as_slice() {
            // Edge inside one set: examined, left standing.
            [Highlight::Boundary(b)] => examined.push(*b),
            // Merge: the opened edge plus both endpoint cells.
            [Highlight::Boundary(b), Highlight::Cell(a), Highlight::Cell(c)] => {
                assert_eq!(b.cells(), (*a, *c));
                assert!(!graph.is_wall(*b));
                examined.push(*b);
            }
            other => panic!("unexpected report shape {other:?}"),
        }
    }
    let examined: HashSet<_> = examined.into_iter().collect();
    let expected: HashSet<_> = graph.boundaries().collect();
    assert_eq!(examined, expected);

    let merges = reports.iter().filter(|r| r.len() == 3).count();
    assert_eq!(merges, graph.cell_count() - 1);
    assert!(is_spanning_tree(&graph));
}

#[test]
fn test_kruskal_on_3x3_makes_eight_merges() {
    let mut graph = GridGraph::new(3, 3).unwrap();
    let mut generator = seeded(GeneratorKind::RandomizedKruskal, 2);
    let reports = run_to_end(generator.as_mut(), &mut graph);

    // The first examined edge always joins two singleton sets.
    assert_eq!(reports[0].len(), 3);
    assert_eq!(open_edges(&graph).len(), 8);
    assert_eq!(reports.iter().filter(|r| r.len() == 3).count(), 8);
    assert!(is_fully_connected(&graph));
}

// --- Wilson ---

#[test]
fn test_wilson_seeds_then_walks_then_carves() {
    let mut graph = GridGraph::new(4, 4).unwrap();
    let mut generator = seeded(GeneratorKind::Wilson, 17);
    let reports = run_to_end(generator.as_mut(), &mut graph);

    // The seed connects exactly one cell and carves nothing.
    assert_eq!(reports[0].len(), 1);
    assert!(matches!(reports[0][0], Highlight::Cell(_)));

    for report in &reports {
        match report.as_slice() {
            // A walk step reports the cell being left.
            [Highlight::Cell(_)] => {}
            // A carve step reports the cell joining the tree and its exit.
            [Highlight::Cell(cell), Highlight::Boundary(exit)] => {
                let (first, second) = exit.cells();
                assert!(*cell == first || *cell == second);
                assert!(!graph.is_wall(*exit));
            }
            other => panic!("unexpected report shape {other:?}"),
        }
    }

    // Every carve connects one new cell.
    let carves = reports.iter().filter(|r| r.len() == 2).count();
    assert_eq!(carves, graph.cell_count() - 1);
    assert!(is_spanning_tree(&graph));
}

// --- Cross-cutting determinism ---

const ALL_KINDS: [GeneratorKind; 4] = [
    GeneratorKind::RandomToggle,
    GeneratorKind::RecursiveBacktracker,
    GeneratorKind::RandomizedKruskal,
    GeneratorKind::Wilson,
];

#[test]
fn test_identical_seeds_reproduce_identical_walls() {
    for kind in ALL_KINDS {
        let mut first = GridGraph::new(5, 4).unwrap();
        let mut second = GridGraph::new(5, 4).unwrap();
        run_to_end(seeded(kind, 1234).as_mut(), &mut first);
        run_to_end(seeded(kind, 1234).as_mut(), &mut second);
        assert_eq!(wall_snapshot(&first), wall_snapshot(&second), "{kind:?}");
    }
}

#[test]
fn test_identical_seeds_reproduce_identical_reports() {
    for kind in ALL_KINDS {
        let mut first = GridGraph::new(4, 4).unwrap();
        let mut second = GridGraph::new(4, 4).unwrap();
        let first_reports = run_to_end(seeded(kind, 77).as_mut(), &mut first);
        let second_reports = run_to_end(seeded(kind, 77).as_mut(), &mut second);
        assert_eq!(first_reports, second_reports, "{kind:?}");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut first = GridGraph::new(5, 4).unwrap();
    let mut second = GridGraph::new(5, 4).unwrap();
    let first_reports =
        run_to_end(seeded(GeneratorKind::RecursiveBacktracker, 1).as_mut(), &mut first);
    let second_reports =
        run_to_end(seeded(GeneratorKind::RecursiveBacktracker, 2).as_mut(), &mut second);
    assert_ne!(first_reports, second_reports);
}

// --- Spanning-tree property across seeds and dimensions ---

proptest! {
    #[test]
    fn test_backtracker_spans_any_grid(w in 1usize..=6, h in 1usize..=6, seed in any::<u64>()) {
        let mut graph = GridGraph::new(w, h).unwrap();
        run_to_end(seeded(GeneratorKind::RecursiveBacktracker, seed).as_mut(), &mut graph);
        prop_assert!(is_spanning_tree(&graph));
    }

    #[test]
    fn test_kruskal_spans_any_grid(w in 1usize..=6, h in 1usize..=6, seed in any::<u64>()) {
        let mut graph = GridGraph::new(w, h).unwrap();
        run_to_end(seeded(GeneratorKind::RandomizedKruskal, seed).as_mut(), &mut graph);
        prop_assert!(is_spanning_tree(&graph));
    }

    #[test]
    fn test_wilson_spans_any_grid(w in 1usize..=6, h in 1usize..=6, seed in any::<u64>()) {
        let mut graph = GridGraph::new(w, h).unwrap();
        run_to_end(seeded(GeneratorKind::Wilson, seed).as_mut(), &mut graph);
        prop_assert!(is_spanning_tree(&graph));
    }

    #[test]
    fn test_toggle_step_count_matches_edge_count(w in 1usize..=6, h in 1usize..=6, seed in any::<u64>()) {
        let mut graph = GridGraph::new(w, h).unwrap();
        let reports = run_to_end(seeded(GeneratorKind::RandomToggle, seed).as_mut(), &mut graph);
        prop_assert_eq!(reports.len(), 2 * w * h - w - h);
    }
}
