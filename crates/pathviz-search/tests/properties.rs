//! Property-based checks of the search strategies against a reference BFS.

use std::collections::{HashSet, VecDeque};

use pathviz_core::{Grid, Pos};
use pathviz_search::{AlgorithmId, Outcome, run};
use proptest::prelude::*;

/// Random grids up to 9x9 with random walls and distinct endpoints.
fn arb_grid() -> impl Strategy<Value = Grid> {
    (2i32..10, 2i32..10).prop_flat_map(|(rows, cols)| {
        let n = (rows * cols) as usize;
        (
            Just((rows, cols)),
            prop::collection::vec(prop::bool::weighted(0.3), n),
            0..n,
            0..n - 1,
        )
            .prop_map(|((rows, cols), walls, s, e)| {
                // Shift `e` past `s` so the endpoints never coincide.
                let e = if e >= s { e + 1 } else { e };
                let at = |i: usize| Pos::new(i as i32 / cols, i as i32 % cols);
                let mut grid = Grid::new(rows, cols, at(s), at(e)).unwrap();
                for (i, wall) in walls.into_iter().enumerate() {
                    if wall {
                        grid.set_wall(at(i), true);
                    }
                }
                grid
            })
    })
}

/// Shortest unweighted distance from start to end, written independently
/// of the crate under test.
fn reference_distance(grid: &Grid) -> Option<usize> {
    let mut seen = HashSet::from([grid.start()]);
    let mut queue = VecDeque::from([(grid.start(), 0usize)]);
    while let Some((p, d)) = queue.pop_front() {
        if p == grid.end() {
            return Some(d);
        }
        for q in p.neighbors_4() {
            if grid.is_passable(q) && seen.insert(q) {
                queue.push_back((q, d + 1));
            }
        }
    }
    None
}

/// The path runs start to end over adjacent, passable cells, never twice
/// through the same cell.
fn assert_valid_path(grid: &Grid, path: &[Pos]) -> Result<(), TestCaseError> {
    prop_assert_eq!(path.first(), Some(&grid.start()));
    prop_assert_eq!(path.last(), Some(&grid.end()));
    for w in path.windows(2) {
        prop_assert!(w[0].is_adjacent(w[1]), "{} -> {} is not a step", w[0], w[1]);
    }
    for p in path {
        prop_assert!(grid.is_passable(*p), "{} is a wall", p);
    }
    let unique: HashSet<&Pos> = path.iter().collect();
    prop_assert_eq!(unique.len(), path.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_runs_are_deterministic(grid in arb_grid()) {
        for a in AlgorithmId::ALL {
            prop_assert_eq!(run(a, &grid).unwrap(), run(a, &grid).unwrap());
        }
    }

    #[test]
    fn prop_bfs_matches_reference(grid in arb_grid()) {
        let result = run(AlgorithmId::Bfs, &grid).unwrap();
        prop_assert_eq!(result.path_len(), reference_distance(&grid));
    }

    #[test]
    fn prop_optimal_strategies_match_bfs(grid in arb_grid()) {
        let bfs = run(AlgorithmId::Bfs, &grid).unwrap().path_len();
        for a in [AlgorithmId::Dijkstra, AlgorithmId::Astar, AlgorithmId::Bidirectional] {
            prop_assert_eq!(run(a, &grid).unwrap().path_len(), bfs, "{}", a);
        }
    }

    #[test]
    fn prop_every_path_is_valid(grid in arb_grid()) {
        let best = reference_distance(&grid);
        for a in AlgorithmId::ALL {
            let result = run(a, &grid).unwrap();
            if let Some(path) = result.path() {
                assert_valid_path(&grid, path)?;
                prop_assert!(result.path_len() >= best, "{} beat the optimum", a);
            }
        }
    }

    #[test]
    fn prop_reachability_is_sound(grid in arb_grid()) {
        let reachable = grid.is_reachable();
        for a in AlgorithmId::ALL {
            let result = run(a, &grid).unwrap();
            prop_assert_eq!(result.outcome != Outcome::NoPath, reachable, "{}", a);
        }
    }

    #[test]
    fn prop_final_step_reflects_outcome(grid in arb_grid()) {
        for a in AlgorithmId::ALL {
            let result = run(a, &grid).unwrap();
            let last = result.final_grid().unwrap();
            let marked = last.count(pathviz_core::Status::Path);
            match result.path_len() {
                Some(len) => prop_assert_eq!(marked, len - 1, "{}", a),
                None => prop_assert_eq!(marked, 0, "{}", a),
            }
        }
    }
}
