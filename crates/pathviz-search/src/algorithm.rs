use std::fmt;
use std::str::FromStr;

use pathviz_core::{Grid, GridError, Pos, Status};

use crate::error::SearchError;
use crate::trace::{PathSampling, SearchResult, Tracer};
use crate::{best_first, bfs, bidirectional, dfs, dijkstra};

/// The six search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlgorithmId {
    #[default]
    Bfs,
    Dfs,
    Dijkstra,
    Astar,
    Greedy,
    Bidirectional,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 6] = [
        Self::Bfs,
        Self::Dfs,
        Self::Dijkstra,
        Self::Astar,
        Self::Greedy,
        Self::Bidirectional,
    ];

    /// Short identifier, as accepted by [`FromStr`].
    pub const fn id(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Dijkstra => "dijkstra",
            Self::Astar => "astar",
            Self::Greedy => "greedy",
            Self::Bidirectional => "bidirectional",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bfs => "Breadth-First Search",
            Self::Dfs => "Depth-First Search",
            Self::Dijkstra => "Dijkstra's Algorithm",
            Self::Astar => "A* Search Algorithm",
            Self::Greedy => "Greedy Best-First Search",
            Self::Bidirectional => "Bidirectional Search",
        }
    }

    /// Whether a found path is always a shortest one.
    pub const fn guarantees_shortest(self) -> bool {
        matches!(
            self,
            Self::Bfs | Self::Dijkstra | Self::Astar | Self::Bidirectional
        )
    }

    pub(crate) const fn path_sampling(self) -> PathSampling {
        match self {
            Self::Bfs | Self::Dfs | Self::Bidirectional => PathSampling::EveryCell,
            Self::Dijkstra | Self::Astar | Self::Greedy => PathSampling::Periodic(3),
        }
    }

    /// Message of the terminal step for a path of `len` moves.
    pub(crate) fn summary(self, len: usize) -> String {
        match self {
            Self::Bfs | Self::Dijkstra => {
                format!("Found shortest path from start to end with length {len}!")
            }
            Self::Astar => format!("Found optimal path from start to end with length {len}!"),
            Self::Dfs | Self::Greedy | Self::Bidirectional => {
                format!("Found path from start to end with length {len}!")
            }
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AlgorithmId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| SearchError::UnknownAlgorithm(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// The grid a run works on: `grid` with its walls, endpoints at `start` and
/// `end`, and no search state.
fn prepare(grid: &Grid, start: Pos, end: Pos) -> Result<Grid, GridError> {
    if start == grid.start() && end == grid.end() {
        let mut base = grid.clone();
        base.clear_search();
        return Ok(base);
    }
    let mut base = Grid::new(grid.rows(), grid.cols(), start, end)?;
    for (p, cell) in grid.iter() {
        if cell.status != Status::Wall {
            continue;
        }
        if p == start || p == end {
            return Err(GridError::Blocked { pos: p });
        }
        base.set_wall(p, true);
    }
    Ok(base)
}

/// Run `algorithm` from `start` to `end` over the walls of `grid`.
///
/// The caller's grid is not modified; the run works on a private copy with
/// the endpoints moved to `start` and `end` if they differ. An unreachable
/// end is not an error: the result's outcome is
/// [`Outcome::NoPath`](crate::Outcome::NoPath).
pub fn run_search(
    algorithm: AlgorithmId,
    grid: &Grid,
    start: Pos,
    end: Pos,
) -> Result<SearchResult, SearchError> {
    let base = prepare(grid, start, end)?;
    let tracer = Tracer::new(&base);
    let result = match algorithm {
        AlgorithmId::Bfs => bfs::search(&base, tracer),
        AlgorithmId::Dfs => dfs::search(&base, tracer),
        AlgorithmId::Dijkstra => dijkstra::search(&base, tracer),
        AlgorithmId::Astar => best_first::astar(&base, tracer),
        AlgorithmId::Greedy => best_first::greedy(&base, tracer),
        AlgorithmId::Bidirectional => bidirectional::search(&base, tracer),
    };
    match &result {
        Ok(r) => log::debug!(
            "{algorithm}: {} steps, path length {:?}",
            r.len(),
            r.path_len()
        ),
        Err(e) => log::error!("{algorithm} from {start} to {end}: {e}"),
    }
    result
}

/// [`run_search`] between the grid's own endpoints.
pub fn run(algorithm: AlgorithmId, grid: &Grid) -> Result<SearchResult, SearchError> {
    run_search(algorithm, grid, grid.start(), grid.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_text() {
        for a in AlgorithmId::ALL {
            assert_eq!(a.to_string().parse::<AlgorithmId>().unwrap(), a);
        }
        assert_eq!("AStar".parse::<AlgorithmId>().unwrap(), AlgorithmId::Astar);
        assert_eq!(
            "bogo".parse::<AlgorithmId>(),
            Err(SearchError::UnknownAlgorithm("bogo".into()))
        );
    }

    #[test]
    fn labels_and_guarantees() {
        assert_eq!(AlgorithmId::Astar.label(), "A* Search Algorithm");
        assert_eq!(AlgorithmId::Dijkstra.label(), "Dijkstra's Algorithm");
        assert!(AlgorithmId::Bidirectional.guarantees_shortest());
        assert!(!AlgorithmId::Greedy.guarantees_shortest());
        assert!(!AlgorithmId::Dfs.guarantees_shortest());
    }

    #[test]
    fn caller_grid_is_untouched() {
        let grid: Grid = "S.#\n...\n#.E".parse().unwrap();
        let before = grid.clone();
        for a in AlgorithmId::ALL {
            run(a, &grid).unwrap();
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn endpoints_can_be_overridden() {
        let grid: Grid = "S...\n....\n...E".parse().unwrap();
        let result = run_search(AlgorithmId::Bfs, &grid, Pos::new(0, 3), Pos::new(2, 0)).unwrap();
        assert_eq!(result.path_len(), Some(5));
        let first = &result.steps[0].grid;
        assert_eq!(first.start(), Pos::new(0, 3));
        assert_eq!(first.status(Pos::new(0, 0)), Some(Status::Empty));

        // Swapping the two endpoints works too.
        let swapped = run_search(AlgorithmId::Bfs, &grid, grid.end(), grid.start()).unwrap();
        assert_eq!(swapped.path().unwrap().first(), Some(&grid.end()));
    }

    #[test]
    fn endpoint_on_a_wall_is_rejected() {
        let grid: Grid = "S#.\n..E".parse().unwrap();
        let err = run_search(AlgorithmId::Bfs, &grid, Pos::new(0, 1), grid.end()).unwrap_err();
        assert_eq!(
            err,
            SearchError::Grid(GridError::Blocked {
                pos: Pos::new(0, 1)
            })
        );
        let err = run_search(AlgorithmId::Bfs, &grid, Pos::new(5, 5), grid.end()).unwrap_err();
        assert!(matches!(err, SearchError::Grid(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn stale_marks_do_not_leak_into_a_run() {
        let mut grid: Grid = "S..\n...\n..E".parse().unwrap();
        grid.mark(Pos::new(1, 1), Status::Path);
        let result = run(AlgorithmId::Bfs, &grid).unwrap();
        assert_eq!(result.steps[0].grid.status(Pos::new(1, 1)), Some(Status::Empty));
    }
}
