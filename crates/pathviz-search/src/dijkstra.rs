use pathviz_core::Status;

use crate::algorithm::AlgorithmId;
use crate::error::SearchError;
use crate::frontier::OpenSet;
use crate::reconstruct::reconstruct;
use crate::trace::{SearchResult, Throttle, Tracer, cell_label};
use crate::traits::WeightedPather;

/// Uniform-cost search.
///
/// Cells leave the frontier in order of tentative distance, ties going to
/// the cell first in row-major order; a closed cell is never relaxed again. The search stops as
/// soon as the end is extracted. Only strictly shorter distances replace a
/// cell's predecessor.
///
/// Expansions are snapshotted on the first one and every third after that;
/// relaxations and completions only on the third ones.
pub(crate) fn search<P: WeightedPather>(
    pather: &P,
    mut tracer: Tracer,
) -> Result<SearchResult, SearchError> {
    let (start, end) = (tracer.grid().start(), tracer.grid().end());
    let mut open = OpenSet::new(tracer.grid().len());
    let mut throttle = Throttle::every(3);
    let mut nbuf = Vec::with_capacity(4);

    if let Some(si) = tracer.grid().index(start) {
        tracer.set_distance(start, 0);
        open.push(si, (0, si));
    }

    let mut found = false;
    while let Some((ci, (dist, _))) = open.pop() {
        let cur = tracer.grid().pos(ci);
        let label = cell_label(cur);
        if cur == end {
            tracer.mark(cur, Status::Visiting);
            tracer.record(format!("Found the end node at {label}!"));
            found = true;
            break;
        }

        tracer.mark(cur, Status::Visiting);
        if throttle.tick() {
            tracer.record(format!("Visiting cell at {label} (distance: {dist})"));
        }
        let beat = throttle.on_beat();

        nbuf.clear();
        pather.neighbors(cur, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = tracer.grid().index(np) else {
                continue;
            };
            if open.is_closed(ni) {
                continue;
            }
            let nd = dist + pather.cost(cur, np);
            if nd >= tracer.distance(np) {
                continue;
            }
            tracer.link(np, cur, nd);
            tracer.mark(np, Status::Visiting);
            open.push(ni, (nd, ni));
            if beat {
                tracer.record(format!(
                    "Updated distance to cell at {}: {nd}",
                    cell_label(np)
                ));
            }
        }

        tracer.mark(cur, Status::Visited);
        if beat {
            tracer.record(format!("Finished visiting cell at {label}"));
        }
    }

    let path = if found {
        Some(reconstruct(tracer.grid())?)
    } else {
        None
    };
    Ok(tracer.conclude(AlgorithmId::Dijkstra, path))
}

#[cfg(test)]
mod tests {
    use pathviz_core::{Grid, Pos};

    use super::*;
    use crate::traits::Pather;

    fn run(text: &str) -> SearchResult {
        let grid: Grid = text.parse().unwrap();
        search(&grid, Tracer::new(&grid)).unwrap()
    }

    #[test]
    fn records_found_end_before_path() {
        let result = run("S..E");
        let messages: Vec<&str> = result.iter().map(|s| s.message.as_str()).collect();
        assert_eq!(messages[0], "Visiting cell at row 0, column 0 (distance: 0)");
        let found = messages
            .iter()
            .position(|m| *m == "Found the end node at row 0, column 3!")
            .unwrap();
        assert!(messages[found + 1].starts_with("Adding cell"));
        assert_eq!(
            *messages.last().unwrap(),
            "Found shortest path from start to end with length 3!"
        );
    }

    #[test]
    fn shortest_around_an_obstacle() {
        let result = run("S.#..\n..#..\n.....\n....E");
        assert_eq!(result.path_len(), Some(7));
    }

    #[test]
    fn distances_are_left_in_the_final_grid() {
        let result = run("S..\n...\n..E");
        let last = result.final_grid().unwrap();
        assert_eq!(last.at(Pos::new(0, 0)).unwrap().distance, 0);
        assert_eq!(last.at(Pos::new(1, 1)).unwrap().distance, 2);
        assert_eq!(last.at(Pos::new(2, 2)).unwrap().distance, 4);
    }

    /// Moving down costs more than moving sideways.
    struct Sloped(Grid);

    impl Pather for Sloped {
        fn neighbors(&self, p: Pos, buf: &mut Vec<Pos>) {
            self.0.neighbors(p, buf);
        }
    }

    impl WeightedPather for Sloped {
        fn cost(&self, from: Pos, to: Pos) -> i32 {
            if to.row > from.row { 5 } else { 1 }
        }
    }

    #[test]
    fn weighted_costs_are_honoured() {
        let grid: Grid = "S...\n....\n#..E".parse().unwrap();
        let result = search(&Sloped(grid.clone()), Tracer::new(&grid)).unwrap();
        let last = result.final_grid().unwrap();
        // Three sideways moves plus two downward moves.
        assert_eq!(last.at(Pos::new(2, 3)).unwrap().distance, 13);
        assert_eq!(result.path_len(), Some(5));
    }
}
