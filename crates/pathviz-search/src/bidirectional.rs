use std::collections::VecDeque;

use pathviz_core::{Grid, Pos, Status, UNREACHABLE};

use crate::algorithm::AlgorithmId;
use crate::error::SearchError;
use crate::reconstruct::walk;
use crate::trace::{SearchResult, Throttle, Tracer, cell_label};
use crate::traits::Pather;

/// One of the two breadth-first frontiers, with its own backpointers.
struct Side {
    name: &'static str,
    queue: VecDeque<Pos>,
    depth: Vec<i32>,
    parent: Vec<Option<Pos>>,
    forward: bool,
}

impl Side {
    fn new(name: &'static str, root: Pos, grid: &Grid, forward: bool) -> Self {
        let mut side = Self {
            name,
            queue: VecDeque::new(),
            depth: vec![UNREACHABLE; grid.len()],
            parent: vec![None; grid.len()],
            forward,
        };
        if let Some(i) = grid.index(root) {
            side.depth[i] = 0;
            side.queue.push_back(root);
        }
        side
    }

    #[inline]
    fn seen(&self, idx: usize) -> bool {
        self.depth[idx] != UNREACHABLE
    }

    /// Expand one cell. Returns the first newly discovered cell that the
    /// other side has already seen.
    fn expand<P: Pather>(
        &mut self,
        other: &Side,
        pather: &P,
        tracer: &mut Tracer,
        throttle: &mut Throttle,
        nbuf: &mut Vec<Pos>,
    ) -> Option<Pos> {
        let cur = self.queue.pop_front()?;
        tracer.mark(cur, Status::Visiting);
        if throttle.tick() {
            tracer.record(format!(
                "{} search visiting cell at {}",
                self.name,
                cell_label(cur)
            ));
        }

        let d = tracer.grid().index(cur).map_or(0, |i| self.depth[i]);
        nbuf.clear();
        pather.neighbors(cur, nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = tracer.grid().index(np) else {
                continue;
            };
            if self.seen(ni) {
                continue;
            }
            self.depth[ni] = d + 1;
            self.parent[ni] = Some(cur);
            if self.forward {
                tracer.link(np, cur, d + 1);
            }
            self.queue.push_back(np);
            tracer.mark(np, Status::Visiting);
            if other.seen(ni) {
                return Some(np);
            }
        }

        tracer.mark(cur, Status::Visited);
        None
    }
}

/// The cheapest way to stitch the two frontiers together once they touch.
///
/// The first meeting cell is a starting bid; every edge from a
/// forward-seen cell into a backward-seen cell is then tried, and only a
/// strictly shorter join replaces it. BFS depths are exact, so the best
/// edge gives the shortest path.
fn settle<P: Pather>(
    grid: &Grid,
    pather: &P,
    fwd: &Side,
    bwd: &Side,
    meet: Pos,
) -> (Pos, Pos) {
    let Some(mi) = grid.index(meet) else {
        return (meet, meet);
    };
    let mut best = (meet, meet);
    let mut best_len = fwd.depth[mi] + bwd.depth[mi];
    let mut nbuf = Vec::with_capacity(4);
    for (m, _) in grid.iter() {
        let Some(bi) = grid.index(m) else {
            continue;
        };
        if !bwd.seen(bi) {
            continue;
        }
        nbuf.clear();
        pather.neighbors(m, &mut nbuf);
        for &q in nbuf.iter() {
            let Some(qi) = grid.index(q) else {
                continue;
            };
            if !fwd.seen(qi) {
                continue;
            }
            let len = fwd.depth[qi] + 1 + bwd.depth[bi];
            if len < best_len {
                best_len = len;
                best = (q, m);
            }
        }
    }
    best
}

/// Two breadth-first searches, one from each endpoint, alternating a single
/// expansion per side (forward first). The run stops as soon as either side
/// discovers a cell the other has seen.
pub(crate) fn search<P: Pather>(pather: &P, mut tracer: Tracer) -> Result<SearchResult, SearchError> {
    let (start, end) = (tracer.grid().start(), tracer.grid().end());
    let mut fwd = Side::new("Forward", start, tracer.grid(), true);
    let mut bwd = Side::new("Backward", end, tracer.grid(), false);
    let mut throttle = Throttle::every(2);
    let mut nbuf = Vec::with_capacity(4);
    tracer.set_distance(start, 0);

    let mut meet = None;
    while !fwd.queue.is_empty() && !bwd.queue.is_empty() {
        meet = fwd.expand(&bwd, pather, &mut tracer, &mut throttle, &mut nbuf);
        if meet.is_some() {
            break;
        }
        meet = bwd.expand(&fwd, pather, &mut tracer, &mut throttle, &mut nbuf);
        if meet.is_some() {
            break;
        }
    }

    let path = match meet {
        Some(meet) => {
            let grid = tracer.grid();
            let (q, m) = settle(grid, pather, &fwd, &bwd, meet);
            let limit = grid.len();
            let parent = |side: &Side, p: Pos| grid.index(p).and_then(|i| side.parent[i]);

            let mut path = walk(q, start, limit, |p| parent(&fwd, p))?;
            path.reverse();
            let tail = walk(m, end, limit, |p| parent(&bwd, p))?;
            let skip = usize::from(q == m);
            path.extend(tail.into_iter().skip(skip));
            Some(path)
        }
        None => None,
    };
    Ok(tracer.conclude(AlgorithmId::Bidirectional, path))
}
