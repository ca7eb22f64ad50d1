//! Heuristic-ordered searches: A* and greedy best-first.
//!
//! Both pop the open cell with the lowest key, ties broken by the order in
//! which cells were first discovered, and both stop when the end is popped.
//! They differ in the key and in how predecessors are assigned.

use pathviz_core::Status;

use crate::algorithm::AlgorithmId;
use crate::error::SearchError;
use crate::frontier::OpenSet;
use crate::reconstruct::reconstruct;
use crate::trace::{SearchResult, Throttle, Tracer, cell_label};
use crate::traits::AstarPather;

/// A*: key is `f = g + h`. A neighbour is re-pointed whenever a strictly
/// cheaper `g` is found for it while it is still open.
pub(crate) fn astar<P: AstarPather>(
    pather: &P,
    mut tracer: Tracer,
) -> Result<SearchResult, SearchError> {
    let (start, end) = (tracer.grid().start(), tracer.grid().end());
    let mut open = OpenSet::new(tracer.grid().len());
    let mut throttle = Throttle::every(3);
    let mut nbuf = Vec::with_capacity(4);

    if let Some(si) = tracer.grid().index(start) {
        tracer.set_distance(start, 0);
        open.push(si, pather.estimate(start, end));
    }

    let mut found = false;
    while let Some((ci, f)) = open.pop() {
        let cur = tracer.grid().pos(ci);
        if cur == end {
            found = true;
            break;
        }

        tracer.mark(cur, Status::Visiting);
        if throttle.tick() {
            tracer.record(format!(
                "Visiting cell at {} (f-score: {f})",
                cell_label(cur)
            ));
        }

        let g = tracer.distance(cur);
        nbuf.clear();
        pather.neighbors(cur, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = tracer.grid().index(np) else {
                continue;
            };
            if open.is_closed(ni) {
                continue;
            }
            let tentative = g + pather.cost(cur, np);
            if tentative >= tracer.distance(np) {
                continue;
            }
            tracer.link(np, cur, tentative);
            open.push(ni, tentative + pather.estimate(np, end));
            tracer.mark(np, Status::Visiting);
        }

        tracer.mark(cur, Status::Visited);
    }

    let path = if found {
        Some(reconstruct(tracer.grid())?)
    } else {
        None
    };
    Ok(tracer.conclude(AlgorithmId::Astar, path))
}

/// Greedy best-first: key is `h` alone. A cell's predecessor is the cell
/// that first discovered it and is never changed afterwards, so the
/// backpointers always form a tree.
pub(crate) fn greedy<P: AstarPather>(
    pather: &P,
    mut tracer: Tracer,
) -> Result<SearchResult, SearchError> {
    let (start, end) = (tracer.grid().start(), tracer.grid().end());
    let mut open = OpenSet::new(tracer.grid().len());
    let mut throttle = Throttle::every(3);
    let mut nbuf = Vec::with_capacity(4);

    if let Some(si) = tracer.grid().index(start) {
        tracer.set_distance(start, 0);
        open.push(si, pather.estimate(start, end));
    }

    let mut found = false;
    while let Some((ci, h)) = open.pop() {
        let cur = tracer.grid().pos(ci);
        if cur == end {
            found = true;
            break;
        }

        tracer.mark(cur, Status::Visiting);
        if throttle.tick() {
            tracer.record(format!(
                "Visiting cell at {} (heuristic: {h})",
                cell_label(cur)
            ));
        }

        let g = tracer.distance(cur);
        nbuf.clear();
        pather.neighbors(cur, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = tracer.grid().index(np) else {
                continue;
            };
            if open.is_closed(ni) {
                continue;
            }
            if !open.is_open(ni) {
                tracer.link(np, cur, g + pather.cost(cur, np));
                open.push(ni, pather.estimate(np, end));
            }
            tracer.mark(np, Status::Visiting);
        }

        tracer.mark(cur, Status::Visited);
    }

    let path = if found {
        Some(reconstruct(tracer.grid())?)
    } else {
        None
    };
    Ok(tracer.conclude(AlgorithmId::Greedy, path))
}
