use pathviz_core::{Grid, Pos};

use crate::distance::manhattan;

/// Minimal search interface: neighbour enumeration.
pub trait Pather {
    /// Append neighbours of `p` into `buf`. The caller clears `buf` before
    /// calling. Order matters: traces follow it.
    fn neighbors(&self, p: Pos, buf: &mut Vec<Pos>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Pos, to: Pos) -> i32;
}

/// Pather with an admissible heuristic, for A* and greedy best-first.
pub trait AstarPather: WeightedPather {
    /// Estimated cost from `from` to `to`. Must never overestimate.
    fn estimate(&self, from: Pos, to: Pos) -> i32;
}

impl Pather for Grid {
    #[inline]
    fn neighbors(&self, p: Pos, buf: &mut Vec<Pos>) {
        Grid::neighbors(self, p, buf);
    }
}

impl WeightedPather for Grid {
    #[inline]
    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

impl AstarPather for Grid {
    #[inline]
    fn estimate(&self, from: Pos, to: Pos) -> i32 {
        manhattan(from, to)
    }
}
