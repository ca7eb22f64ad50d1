//! Reachability precheck.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::geom::Pos;

/// Whether `end` can be reached from `start` through non-wall cells.
///
/// A plain breadth-first flood over walls only; search marks and scratch
/// state are ignored and the grid is not touched. Out-of-bounds or walled
/// endpoints are unreachable.
pub fn is_reachable(grid: &Grid, start: Pos, end: Pos) -> bool {
    let (Some(si), Some(ei)) = (grid.index(start), grid.index(end)) else {
        return false;
    };
    if !grid.is_passable(start) || !grid.is_passable(end) {
        return false;
    }
    if si == ei {
        return true;
    }

    let mut seen = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    seen[si] = true;
    queue.push_back(start);

    while let Some(p) = queue.pop_front() {
        for n in p.neighbors_4() {
            let Some(ni) = grid.index(n) else {
                continue;
            };
            if seen[ni] || !grid.is_passable(n) {
                continue;
            }
            if ni == ei {
                return true;
            }
            seen[ni] = true;
            queue.push_back(n);
        }
    }
    false
}

impl Grid {
    /// [`is_reachable`] between this grid's own endpoints.
    pub fn is_reachable(&self) -> bool {
        is_reachable(self, self.start(), self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_is_reachable() {
        let g = Grid::new(4, 6, Pos::new(0, 0), Pos::new(3, 5)).unwrap();
        assert!(g.is_reachable());
    }

    #[test]
    fn full_wall_row_blocks() {
        let g: Grid = "\
            S....
            .....
            #####
            .....
            ....E"
            .parse()
            .unwrap();
        assert!(!g.is_reachable());
    }

    #[test]
    fn winding_corridor() {
        let g: Grid = "\
            S#...
            .#.#.
            .#.#.
            ...#E"
            .parse()
            .unwrap();
        assert!(g.is_reachable());
    }

    #[test]
    fn enclosed_end() {
        let g: Grid = "\
            S....
            ...#.
            ..#E#
            ...#."
            .parse()
            .unwrap();
        assert!(!g.is_reachable());
    }

    #[test]
    fn arbitrary_cells_and_bounds() {
        let g: Grid = "S.#.\n..#E".parse().unwrap();
        assert!(is_reachable(&g, Pos::new(0, 0), Pos::new(1, 1)));
        assert!(!is_reachable(&g, Pos::new(0, 0), Pos::new(0, 3)));
        assert!(!is_reachable(&g, Pos::new(0, 0), Pos::new(0, 2)));
        assert!(!is_reachable(&g, Pos::new(0, 0), Pos::new(7, 7)));
        assert!(is_reachable(&g, Pos::new(0, 1), Pos::new(0, 1)));
    }

    #[test]
    fn search_marks_do_not_block() {
        let mut g: Grid = "S..\n...\n..E".parse().unwrap();
        for c in 0..3 {
            g.mark(Pos::new(1, c), crate::Status::Visited);
        }
        assert!(g.is_reachable());
    }
}
